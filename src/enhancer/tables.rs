use unicode_normalization::UnicodeNormalization;

use super::Handler;
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

const SEARCH_INPUT_STYLE: &str = "
    width: 100%;
    max-width: 300px;
    padding: 10px 15px;
    margin-bottom: 15px;
    border: 2px solid #ddd;
    border-radius: 8px;
    font-size: 14px;
";

impl Page {
    /// Puts a search box in front of every table. Each box filters the rows
    /// of its own table. Tables that already have one are skipped.
    pub fn init_table_search(&mut self) -> Result<()> {
        let tables = self.dom.query_selector_all("table")?;
        self.trace_pass("table search", tables.len());
        for table in tables {
            if self.table_search_inputs.contains_key(&table) {
                continue;
            }
            let Some(container) = self.dom.parent(table) else {
                continue;
            };

            let search = self.dom.create_detached_element("input");
            self.dom.set_attr(search, "type", "text")?;
            self.dom.set_attr(search, "placeholder", "Search courses...")?;
            self.dom.set_attr(search, "class", "table-search")?;
            self.dom.set_css_text(search, SEARCH_INPUT_STYLE)?;
            self.dom.insert_before(container, search, table)?;

            self.listen(search, "input", Handler::FilterTableRows { table });
            self.table_search_inputs.insert(table, search);
        }
        Ok(())
    }

    /// Hides body rows whose text does not contain the query. Rows are only
    /// shown or hidden, never moved.
    pub(super) fn filter_table_rows(&mut self, table: NodeId, search: NodeId) -> Result<()> {
        let query = fold_for_search(&self.dom.value(search)?);
        let rows = self.dom.query_selector_all_from(table, "tbody tr")?;
        let mut visible = 0usize;
        for row in &rows {
            let matches = fold_for_search(&self.dom.text_content(*row)).contains(&query);
            if matches {
                visible += 1;
            }
            self.dom
                .style_set(*row, "display", if matches { "" } else { "none" })?;
        }
        self.trace_enhancer_line(format!(
            "[enhancer] table search query={query:?} visible={visible}/{}",
            rows.len()
        ));
        Ok(())
    }
}

/// Compatibility-normalized, lowercased text so that full-width and
/// composed forms match what the user types.
pub(crate) fn fold_for_search(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_ignores_case_and_width() {
        assert_eq!(fold_for_search("CS-101 Intro"), "cs-101 intro");
        assert_eq!(fold_for_search("ＣＳ１０１"), "cs101");
        assert!(fold_for_search("Café").contains(&fold_for_search("cafe\u{301}")));
    }
}
