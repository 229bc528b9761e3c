//! Decoration passes run over a loaded page.
//!
//! Listeners and timers are registered as data ([`Handler`], [`TimerAction`])
//! and interpreted here, so every per-element behaviour is a plain function of
//! the page and its target node.

mod alerts;
mod animations;
mod banner;
mod forms;
mod tables;

use std::fmt;

use crate::dom::NodeId;
use crate::events::{EventState, Listener};
use crate::page::Page;
use crate::Result;

/// Keyframes (`shake`, `pulse`, `slideIn`) and the `.pulse` class used by the
/// enhancer's inline styles.
pub const ENHANCER_STYLESHEET: &str = include_str!("../../assets/enhancer.css");

const STYLESHEET_ID: &str = "portal-enhancer-styles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnrollmentDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Handler {
    ValidateRequiredFields,
    ConfirmEnrollmentDecision(EnrollmentDecision),
    ConfirmGradeSubmission,
    DismissAlert { alert: NodeId },
    LiftButton,
    RestButton,
    PulseButton,
    SettlePulse,
    FilterTableRows { table: NodeId },
    CheckGradeInput,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimerAction {
    RevealSection,
    RevealRow,
    ClearShake,
    /// Starts the slide-out and schedules removal once it has played.
    FadeOut { fade_ms: i64 },
    RemoveNode,
}

impl TimerAction {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::RevealSection => "reveal-section",
            Self::RevealRow => "reveal-row",
            Self::ClearShake => "clear-shake",
            Self::FadeOut { .. } => "fade-out",
            Self::RemoveNode => "remove-node",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ObserverCallback {
    RevealSection,
}

impl Page {
    /// Runs every decoration pass once. Later calls do nothing.
    pub fn boot(&mut self) -> Result<()> {
        if self.booted {
            return Ok(());
        }
        self.booted = true;

        self.install_stylesheet()?;
        if self.config.button_effects {
            self.init_button_effects()?;
        }
        if self.config.grade_validation {
            self.init_grade_validation()?;
        }
        if self.config.console_banner {
            self.print_console_banner();
        }

        self.add_racing_stripe()?;
        self.init_section_animations()?;
        self.init_form_validations()?;
        self.init_confirmation_dialogs()?;
        self.auto_hide_alerts()?;
        self.init_table_animations()?;

        if self.config.table_search {
            self.init_table_search()?;
        }
        log::debug!("page enhancer booted");
        Ok(())
    }

    pub(crate) fn run_handler(&mut self, handler: &Handler, event: &mut EventState) -> Result<()> {
        let node = event.current_target;
        match handler {
            Handler::ValidateRequiredFields => self.validate_required_fields(node, event),
            Handler::ConfirmEnrollmentDecision(decision) => {
                self.confirm_enrollment_decision(*decision, event);
                Ok(())
            }
            Handler::ConfirmGradeSubmission => self.confirm_grade_submission(node, event),
            Handler::DismissAlert { alert } => self.dismiss_alert(*alert),
            Handler::LiftButton => self.dom.style_set(node, "transform", "translateY(-2px)"),
            Handler::RestButton => self.dom.style_set(node, "transform", "translateY(0)"),
            Handler::PulseButton => self.dom.class_add(node, "pulse"),
            Handler::SettlePulse => self.dom.class_remove(node, "pulse"),
            Handler::FilterTableRows { table } => self.filter_table_rows(*table, node),
            Handler::CheckGradeInput => self.check_grade_input(node),
        }
    }

    pub(crate) fn run_timer_action(&mut self, target: NodeId, action: &TimerAction) -> Result<()> {
        match action {
            TimerAction::RevealSection => self.reveal_section(target),
            TimerAction::RevealRow => self.reveal_row(target),
            TimerAction::ClearShake => self.dom.style_set(target, "animation", ""),
            TimerAction::FadeOut { fade_ms } => self.fade_out(target, *fade_ms),
            TimerAction::RemoveNode => self.remove_element(target),
        }
    }

    pub(crate) fn run_observer_callback(
        &mut self,
        target: NodeId,
        callback: &ObserverCallback,
    ) -> Result<()> {
        match callback {
            ObserverCallback::RevealSection => self.reveal_section_in_view(target),
        }
    }

    pub(crate) fn listen(&mut self, node: NodeId, event: &str, handler: Handler) {
        self.listeners.add(
            node,
            event,
            Listener {
                capture: false,
                handler,
            },
        );
    }

    pub(crate) fn set_timeout(&mut self, delay_ms: i64, target: NodeId, action: TimerAction) -> i64 {
        let name = action.name();
        let id = self.scheduler.schedule(delay_ms, target, action);
        if self.trace_state.enabled {
            let target_label = self.trace_node_label(target);
            self.trace_timer_line(format!(
                "[timer] schedule id={id} delay_ms={delay_ms} action={name} target={target_label}"
            ));
        }
        id
    }

    /// Detaches `node` and drops every timer and observation aimed at it or
    /// its descendants.
    pub(crate) fn remove_element(&mut self, node: NodeId) -> Result<()> {
        if !self.dom.remove_node(node)? {
            return Ok(());
        }
        let cancelled = self.scheduler.cancel_for_subtree(&self.dom, node);
        self.viewport.unobserve_subtree(&self.dom, node);
        self.dismissing.remove(&node);
        self.listeners.remove_subtree(&self.dom, node);
        if self.trace_state.enabled {
            let label = self.trace_node_label(node);
            self.trace_enhancer_line(format!(
                "[enhancer] removed {label} cancelled_timers={cancelled:?}"
            ));
        }
        Ok(())
    }

    fn install_stylesheet(&mut self) -> Result<()> {
        if self
            .dom
            .query_selector(&format!("style#{STYLESHEET_ID}"))?
            .is_some()
        {
            return Ok(());
        }
        let parent = self.dom.head().unwrap_or_else(|| self.dom.body());
        let style = self.dom.create_detached_element("style");
        self.dom.set_attr(style, "id", STYLESHEET_ID)?;
        self.dom.set_text_content(style, ENHANCER_STYLESHEET)?;
        self.dom.append_child(parent, style)
    }

    fn trace_pass(&mut self, pass: &str, matched: usize) {
        log::debug!("{pass}: {matched} element(s)");
        self.trace_enhancer_line(format!("[enhancer] {pass} matched={matched}"));
    }
}

/// `all 0.6s ease` for 600ms.
pub(crate) fn transition(duration_ms: i64) -> String {
    format!("all {} ease", seconds(duration_ms))
}

pub(crate) fn seconds(duration_ms: i64) -> String {
    format!("{}s", duration_ms as f64 / 1000.0)
}
