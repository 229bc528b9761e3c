use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::EnhancerConfig;
use crate::dom::{Dom, NodeId};
use crate::enhancer::Severity;
use crate::events::ListenerStore;
use crate::html::parse_document;
use crate::scheduler::SchedulerState;
use crate::trace::TraceState;
use crate::viewport::ViewportState;
use crate::{Error, Result};

/// A message surfaced through the transient notification box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// A form submission that no listener cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub method: String,
    /// Successful controls as `(name, value)` in document order.
    pub entries: Vec<(String, String)>,
}

/// One console line, with the CSS applied to its `%c` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub message: String,
    pub style: String,
}

#[derive(Debug)]
pub(crate) struct PlatformMocks {
    pub(crate) confirm_responses: VecDeque<bool>,
    pub(crate) default_confirm_response: bool,
    pub(crate) confirm_messages: Vec<String>,
}

impl Default for PlatformMocks {
    fn default() -> Self {
        Self {
            confirm_responses: VecDeque::new(),
            default_confirm_response: true,
            confirm_messages: Vec::new(),
        }
    }
}

/// A loaded portal page: document, listeners, virtual clock and the
/// enhancer's transient state.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) config: EnhancerConfig,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) viewport: ViewportState,
    pub(crate) platform_mocks: PlatformMocks,
    pub(crate) trace_state: TraceState,
    pub(crate) console: Vec<ConsoleEntry>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) form_submissions: Vec<FormSubmission>,
    /// Alerts and notifications whose fade-out has started.
    pub(crate) dismissing: HashSet<NodeId>,
    /// Table to the search box filtering it.
    pub(crate) table_search_inputs: HashMap<NodeId, NodeId>,
    pub(crate) booted: bool,
}

impl Page {
    /// Loads a page, taking configuration from its `enhancer-config` meta tag
    /// when present.
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_document(html)?;
        let config = EnhancerConfig::from_meta(&dom)?.unwrap_or_default();
        Ok(Self::with_dom(dom, config))
    }

    /// Loads a page with an explicit configuration; any meta tag is ignored.
    pub fn from_html_with_config(html: &str, config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_document(html)?;
        Ok(Self::with_dom(dom, config))
    }

    fn with_dom(dom: Dom, config: EnhancerConfig) -> Self {
        Self {
            dom,
            config,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            viewport: ViewportState::default(),
            platform_mocks: PlatformMocks::default(),
            trace_state: TraceState::default(),
            console: Vec::new(),
            notifications: Vec::new(),
            form_submissions: Vec::new(),
            dismissing: HashSet::new(),
            table_search_inputs: HashMap::new(),
            booted: false,
        }
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.is_effectively_disabled(target) {
            return Ok(());
        }
        let tag = self.element_tag(selector, target)?;
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.is_effectively_disabled(target) {
            return Ok(());
        }
        let tag = self.element_tag(selector, target)?;
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        self.dom.set_select_value(target, value)?;
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        Ok(())
    }

    /// Clicks an element. Disabled controls ignore the click; an uncancelled
    /// click on a submit control asks its form to submit.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.is_effectively_disabled(target) {
            return Ok(());
        }
        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }
        if self.is_submit_control(target) {
            if let Some(form) = self.resolve_form_for_submit(target) {
                self.request_form_submit(form)?;
            }
        }
        Ok(())
    }

    /// Submits the form matched by `selector`, or the form owning the
    /// matched control.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let Some(form) = self.resolve_form_for_submit(target) else {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.element_tag(selector, target)?,
            });
        };
        self.request_form_submit(form)
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseenter")?;
        Ok(())
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseleave")?;
        Ok(())
    }

    /// Presses and releases the primary button without clicking.
    pub fn press(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.is_effectively_disabled(target) {
            return Ok(());
        }
        self.dispatch_event(target, "mousedown")?;
        self.dispatch_event(target, "mouseup")?;
        Ok(())
    }

    /// Reports that a CSS animation on the element finished.
    pub fn end_animation(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "animationend")?;
        Ok(())
    }

    /// Fires an arbitrary event and returns whether a listener cancelled it.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dispatch_event(target, event_type)?.default_prevented)
    }

    pub fn enqueue_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.confirm_responses.push_back(accepted);
    }

    pub fn set_default_confirm_response(&mut self, accepted: bool) {
        self.platform_mocks.default_confirm_response = accepted;
    }

    pub fn take_confirm_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.confirm_messages)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn take_form_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.form_submissions)
    }

    pub fn console_entries(&self) -> &[ConsoleEntry] {
        &self.console
    }

    /// Blocking confirmation prompt, answered from the queued responses.
    pub(crate) fn confirm(&mut self, message: &str) -> bool {
        self.platform_mocks
            .confirm_messages
            .push(message.to_string());
        let accepted = self
            .platform_mocks
            .confirm_responses
            .pop_front()
            .unwrap_or(self.platform_mocks.default_confirm_response);
        self.trace_enhancer_line(format!(
            "[enhancer] confirm message={message:?} accepted={accepted}"
        ));
        accepted
    }

    fn request_form_submit(&mut self, form: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(form, "submit")?;
        if outcome.default_prevented {
            return Ok(());
        }
        let submission = FormSubmission {
            action: self.dom.attr(form, "action").unwrap_or_default(),
            method: self
                .dom
                .attr(form, "method")
                .unwrap_or_else(|| "get".into())
                .to_ascii_lowercase(),
            entries: self.form_data_entries(form)?,
        };
        log::debug!(
            "form submitted: {} {} ({} entries)",
            submission.method,
            submission.action,
            submission.entries.len()
        );
        self.form_submissions.push(submission);
        Ok(())
    }

    pub(crate) fn resolve_form_for_submit(&self, target: NodeId) -> Option<NodeId> {
        if self.dom.is_tag(target, "form") {
            return Some(target);
        }
        self.dom.find_ancestor_by_tag(target, "form")
    }

    pub(crate) fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .dom
            .attr(node, "type")
            .map(|kind| kind.to_ascii_lowercase());
        if self.dom.is_tag(node, "button") {
            return kind.as_deref().is_none_or(|kind| kind == "submit");
        }
        self.dom.is_tag(node, "input") && matches!(kind.as_deref(), Some("submit" | "image"))
    }

    pub(crate) fn is_effectively_disabled(&self, node: NodeId) -> bool {
        if self.dom.disabled(node) {
            return true;
        }
        let mut cursor = self.dom.parent(node);
        while let Some(ancestor) = cursor {
            if self.dom.is_tag(ancestor, "fieldset") && self.dom.disabled(ancestor) {
                return true;
            }
            cursor = self.dom.parent(ancestor);
        }
        false
    }

    fn form_data_entries(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for control in self.dom.query_selector_all_from(form, "input, select, textarea")? {
            if self.is_effectively_disabled(control) {
                continue;
            }
            let name = self.dom.attr(control, "name").unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            if self.dom.is_tag(control, "input") {
                let kind = self
                    .dom
                    .attr(control, "type")
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                if matches!(
                    kind.as_str(),
                    "button" | "submit" | "reset" | "file" | "image"
                ) {
                    continue;
                }
                if (kind == "checkbox" || kind == "radio")
                    && !self.dom.has_attr(control, "checked")
                {
                    continue;
                }
            }
            out.push((name, self.dom.value(control)?));
        }
        Ok(out)
    }

    fn element_tag(&self, selector: &str, node: NodeId) -> Result<String> {
        self.dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "element".into(),
                actual: "non-element".into(),
            })
    }
}
