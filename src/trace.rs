use std::collections::VecDeque;

use crate::dom::{NodeId, NodeType};
use crate::page::Page;
use crate::{Error, Result};

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) enhancer: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_log: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            enhancer: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_log: false,
        }
    }
}

impl Page {
    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_state.timers = enabled;
    }

    pub fn set_trace_enhancer(&mut self, enabled: bool) {
        self.trace_state.enhancer = enabled;
    }

    /// Also forward each trace line to `log::trace!`.
    pub fn set_trace_to_log(&mut self, enabled: bool) {
        self.trace_state.to_log = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.timers {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_enhancer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.enhancer {
            self.trace_line(line);
        }
    }

    fn trace_line(&mut self, line: String) {
        if self.trace_state.to_log {
            log::trace!("{line}");
        }
        if self.trace_state.logs.len() >= self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        self.trace_state.logs.push_back(line);
    }

    pub(crate) fn trace_node_label(&self, node_id: NodeId) -> String {
        match self.dom.nodes.get(node_id.0).map(|node| &node.node_type) {
            Some(NodeType::Document) => "#document".into(),
            Some(NodeType::Text(_)) => "#text".into(),
            Some(NodeType::Element(element)) => {
                let mut label = element.tag_name.clone();
                if let Some(id) = element.attrs.get("id") {
                    label.push('#');
                    label.push_str(id);
                } else if let Some(class) = element.attrs.get("class") {
                    for token in class.split_whitespace() {
                        label.push('.');
                        label.push_str(token);
                    }
                }
                label
            }
            None => format!("#missing({})", node_id.0),
        }
    }
}
