use std::collections::HashMap;

use crate::html::parse_fragment;
use crate::{Error, Result};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) required: bool,
}

impl Element {
    fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let required = attrs.contains_key("required");
        Self {
            tag_name,
            attrs,
            value,
            disabled,
            required,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        self.create_node(Some(parent), NodeType::Element(Element::new(tag_name, attrs)))
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        self.create_node(
            None,
            NodeType::Element(Element::new(tag_name.to_ascii_lowercase(), HashMap::new())),
        )
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn first_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.children(node_id).first().copied()
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// `<body>` when the page has one, otherwise the document itself.
    pub(crate) fn body(&self) -> NodeId {
        self.first_element_by_tag("body").unwrap_or(self.root)
    }

    pub(crate) fn head(&self) -> Option<NodeId> {
        self.first_element_by_tag("head")
    }

    fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.all_element_nodes()
            .into_iter()
            .find(|node| self.is_tag(*node, tag))
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node_id, &mut out);
        out
    }

    fn collect_text(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document | NodeType::Element(_) => {
                    for child in &self.nodes[node_id.0].children {
                        self.collect_text(*child, out);
                    }
                }
                NodeType::Text(text) => out.push_str(text),
            }
        })
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("textContent target is not an element".into()));
        }
        self.detach_children(node_id);
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> Result<String> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("innerHTML target is not an element".into()));
        }
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            out.push_str(&self.dump_node(*child));
        }
        Ok(out)
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("innerHTML target is not an element".into()));
        }

        let fragment = parse_fragment(html)?;
        self.detach_children(node_id);

        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            self.clone_subtree_from_dom(&fragment, child, Some(node_id))?;
        }
        Ok(())
    }

    fn detach_children(&mut self, node_id: NodeId) {
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
    }

    fn clone_subtree_from_dom(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let node_type = match &source.nodes[source_node.0].node_type {
            NodeType::Document => {
                return Err(Error::Runtime(
                    "cannot clone document node into innerHTML target".into(),
                ));
            }
            NodeType::Element(element) => NodeType::Element(element.clone()),
            NodeType::Text(text) => NodeType::Text(text.clone()),
        };

        let node = self.create_node(parent, node_type);
        for child in &source.nodes[source_node.0].children {
            self.clone_subtree_from_dom(source, *child, Some(node))?;
        }
        Ok(node)
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        if is_checkbox_or_radio(element) && !element.attrs.contains_key("value") {
            return Ok("on".to_string());
        }
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }

        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            } else if self.is_tag(node, "select") {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    /// Selects the first option whose value matches; with no match the select
    /// ends up with an empty value, as in a browser.
    pub(crate) fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        if !self.is_tag(select_node, "select") {
            return Err(Error::Runtime("set value target is not a select".into()));
        }

        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let mut matched = None;
        for option in &options {
            let value = self.option_effective_value(*option)?;
            if matched.is_none() && value == requested {
                matched = Some((*option, value));
            }
        }

        for option in &options {
            let selected = matched.as_ref().is_some_and(|(node, _)| node == option);
            let option_element = self
                .element_mut(*option)
                .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
            if selected {
                option_element
                    .attrs
                    .insert("selected".to_string(), "true".to_string());
            } else {
                option_element.attrs.remove("selected");
            }
        }

        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = matched.map(|(_, value)| value).unwrap_or_default();
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);
        let value = match options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())
        {
            Some(selected) => self.option_effective_value(selected)?,
            None => String::new(),
        };
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = value;
        Ok(())
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if self.is_tag(*child, "option") {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        let element = self
            .element(option_node)
            .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
        if let Some(value) = element.attrs.get("value") {
            return Ok(value.clone());
        }
        Ok(self.text_content(option_node).trim().to_string())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.disabled)
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.required)
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("setAttribute target is not an element".into()))?;
        let lowered = name.to_ascii_lowercase();
        element.attrs.insert(lowered.clone(), value.to_string());

        match lowered.as_str() {
            "value" => element.value = value.to_string(),
            "disabled" => element.disabled = true,
            "required" => element.required = true,
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child, "appendChild")?;
        self.unlink(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub(crate) fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.first_child(parent) {
            Some(reference) => self.insert_before(parent, child, reference),
            None => self.append_child(parent, child),
        }
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        self.check_insertion(parent, child, "insertBefore")?;
        if self.parent(reference) != Some(parent) {
            return Err(Error::Runtime(
                "insertBefore reference is not a direct child".into(),
            ));
        }
        if child == reference {
            return Ok(());
        }

        self.unlink(child);
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
        else {
            return Err(Error::Runtime("insertBefore reference is missing".into()));
        };

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId, op: &str) -> Result<()> {
        let parent_ok = matches!(
            self.nodes.get(parent.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        );
        if !parent_ok {
            return Err(Error::Runtime(format!("{op} target cannot have children")));
        }
        if child == self.root || child == parent || child.0 >= self.nodes.len() {
            return Err(Error::Runtime(format!("invalid {op} node")));
        }

        // Parent must not be inside child's subtree.
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::Runtime(format!("{op} would create a cycle")));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = None;
    }

    /// Detaches `node`. Already-detached nodes are left alone.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<bool> {
        if node == self.root {
            return Err(Error::Runtime("cannot remove document root".into()));
        }
        if self.parent(node).is_none() {
            return Ok(false);
        }
        self.unlink(node);
        Ok(true)
    }

    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let name = name.to_ascii_lowercase();
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        Ok(decls
            .into_iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    /// An empty value removes the declaration.
    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let name = name.to_ascii_lowercase();

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| *prop == name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }
        write_style_attr(element, &decls);
        Ok(())
    }

    pub(crate) fn set_css_text(&mut self, node_id: NodeId, css_text: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let decls = parse_style_declarations(Some(css_text));
        write_style_attr(element, &decls);
        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.is_tag(current, tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &self.nodes[node_id.0].children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node_id, &mut out);
        out
    }

    fn write_node(&self, node_id: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            match &self.nodes[node_id.0].node_type {
                NodeType::Document => {
                    for child in &self.nodes[node_id.0].children {
                        self.write_node(*child, out);
                    }
                }
                NodeType::Text(text) => out.push_str(text),
                NodeType::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag_name);
                    let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                    attrs.sort();
                    for (k, v) in attrs {
                        out.push(' ');
                        out.push_str(k);
                        out.push_str("=\"");
                        out.push_str(v);
                        out.push('"');
                    }
                    out.push('>');
                    if crate::html::is_void_tag(&element.tag_name) {
                        return;
                    }
                    for child in &self.nodes[node_id.0].children {
                        self.write_node(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        })
    }
}

fn is_checkbox_or_radio(element: &Element) -> bool {
    element.tag_name.eq_ignore_ascii_case("input")
        && element
            .attrs
            .get("type")
            .is_some_and(|kind| {
                kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio")
            })
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn write_style_attr(element: &mut Element, decls: &[(String, String)]) {
    if decls.is_empty() {
        element.attrs.remove("style");
    } else {
        element
            .attrs
            .insert("style".to_string(), serialize_style_declarations(decls));
    }
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| *existing == name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_style(dom: &mut Dom, style: &str) -> NodeId {
        let root = dom.root;
        let mut attrs = HashMap::new();
        attrs.insert("style".to_string(), style.to_string());
        dom.create_element(root, "div".into(), attrs)
    }

    #[test]
    fn style_set_replaces_existing_declaration_in_place() -> Result<()> {
        let mut dom = Dom::new();
        let node = element_with_style(&mut dom, "opacity: 0; transform: translateY(30px)");
        dom.style_set(node, "opacity", "1")?;
        assert_eq!(
            dom.attr(node, "style").as_deref(),
            Some("opacity: 1; transform: translateY(30px);")
        );
        Ok(())
    }

    #[test]
    fn style_set_with_empty_value_removes_declaration() -> Result<()> {
        let mut dom = Dom::new();
        let node = element_with_style(&mut dom, "display: none");
        dom.style_set(node, "display", "")?;
        assert_eq!(dom.attr(node, "style"), None);
        assert_eq!(dom.style_get(node, "display")?, "");
        Ok(())
    }

    #[test]
    fn css_text_is_normalized_from_multiline_source() -> Result<()> {
        let mut dom = Dom::new();
        let node = element_with_style(&mut dom, "");
        dom.set_css_text(
            node,
            "\n    float: right;\n    font-size: 24px;\n    cursor: pointer;\n",
        )?;
        assert_eq!(dom.style_get(node, "float")?, "right");
        assert_eq!(dom.style_get(node, "font-size")?, "24px");
        assert_eq!(dom.style_get(node, "cursor")?, "pointer");
        Ok(())
    }

    #[test]
    fn checkbox_without_value_attribute_reports_on() -> Result<()> {
        let mut dom = Dom::new();
        let root = dom.root;
        let mut attrs = HashMap::new();
        attrs.insert("type".to_string(), "Checkbox".to_string());
        let bare = dom.create_element(root, "input".into(), attrs.clone());
        attrs.insert("value".to_string(), "yes".to_string());
        let valued = dom.create_element(root, "input".into(), attrs);
        assert_eq!(dom.value(bare)?, "on");
        assert_eq!(dom.value(valued)?, "yes");
        Ok(())
    }

    #[test]
    fn removing_a_detached_node_is_a_noop() -> Result<()> {
        let mut dom = Dom::new();
        let node = element_with_style(&mut dom, "");
        assert!(dom.remove_node(node)?);
        assert!(!dom.remove_node(node)?);
        assert!(!dom.is_connected(node));
        Ok(())
    }

    #[test]
    fn class_add_and_remove_keep_other_tokens() -> Result<()> {
        let mut dom = Dom::new();
        let root = dom.root;
        let mut attrs = HashMap::new();
        attrs.insert("class".to_string(), "btn btn-primary".to_string());
        let node = dom.create_element(root, "button".into(), attrs);
        dom.class_add(node, "pulse")?;
        assert!(dom.class_contains(node, "pulse"));
        dom.class_remove(node, "pulse")?;
        assert_eq!(dom.attr(node, "class").as_deref(), Some("btn btn-primary"));
        Ok(())
    }

    #[test]
    fn truncate_chars_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }
}
