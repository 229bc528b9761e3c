use crate::dom::{NodeId, parse_style_declarations, truncate_chars};
use crate::page::Page;
use crate::{Error, Result};

impl Page {
    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    /// Inline style property; empty when unset.
    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.style_get(target, property)
    }

    /// All inline declarations in source order.
    pub fn styles(&self, selector: &str) -> Result<Vec<(String, String)>> {
        let target = self.select_one(selector)?;
        Ok(parse_style_declarations(
            self.dom.attr(target, "style").as_deref(),
        ))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.is_effectively_disabled(target))
    }

    /// Serialized children, attributes in name order.
    pub fn inner_html(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.inner_html(target)
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check(selector, target, expected, actual)
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property)?;
        self.check(selector, target, expected, actual)
    }

    /// `None` asserts the attribute is absent.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: format!("{selector}@{name}"),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
            dom_snippet: self.node_snippet(target),
        })
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_absent(&self, selector: &str) -> Result<()> {
        match self.dom.query_selector(selector)? {
            None => Ok(()),
            Some(node) => Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: "no match".into(),
                actual: "element present".into(),
                dom_snippet: self.node_snippet(node),
            }),
        }
    }

    pub fn assert_count(&self, selector: &str, expected: usize) -> Result<()> {
        let matched = self.dom.query_selector_all(selector)?;
        if matched.len() == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: matched.len().to_string(),
            dom_snippet: matched
                .first()
                .map(|node| self.node_snippet(*node))
                .unwrap_or_default(),
        })
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: String) -> Result<()> {
        if actual == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
            dom_snippet: self.node_snippet(target),
        })
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_assertion_carries_snippet() -> Result<()> {
        let page = Page::from_html(r#"<p id="msg" class="alert">Saved</p>"#)?;
        page.assert_text("#msg", "Saved")?;
        match page.assert_text("#msg", "Deleted") {
            Err(Error::AssertionFailed {
                actual,
                dom_snippet,
                ..
            }) => {
                assert_eq!(actual, "Saved");
                assert!(dom_snippet.contains(r#"<p class="alert" id="msg">"#));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn missing_elements_are_reported() -> Result<()> {
        let page = Page::from_html("<div></div>")?;
        assert!(matches!(
            page.text("#nope"),
            Err(Error::SelectorNotFound(_))
        ));
        page.assert_absent("#nope")?;
        page.assert_count("div", 1)?;
        assert!(page.assert_count("div", 2).is_err());
        Ok(())
    }

    #[test]
    fn attr_assertion_distinguishes_absent() -> Result<()> {
        let page = Page::from_html(r#"<button id="b" disabled>Go</button>"#)?;
        page.assert_attr("#b", "disabled", Some("true"))?;
        page.assert_attr("#b", "type", None)?;
        assert!(page.is_disabled("#b")?);
        Ok(())
    }
}
