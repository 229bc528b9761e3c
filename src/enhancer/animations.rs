use super::{Handler, ObserverCallback, TimerAction, transition};
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

impl Page {
    pub(super) fn add_racing_stripe(&mut self) -> Result<()> {
        let body = self.dom.body();
        let stripe = self.dom.create_detached_element("div");
        self.dom.set_attr(stripe, "class", "racing-stripe")?;
        self.dom.prepend_child(body, stripe)
    }

    pub(super) fn init_section_animations(&mut self) -> Result<()> {
        let sections = self.dom.query_selector_all(".section")?;
        self.trace_pass("section animations", sections.len());
        for (index, section) in sections.iter().enumerate() {
            self.attach_section_animation(*section, index)?;
        }

        let observer = self.viewport.create_observer(
            self.config.reveal_threshold,
            ObserverCallback::RevealSection,
        );
        for section in sections {
            self.observe_element(observer, section)?;
        }
        Ok(())
    }

    pub(super) fn attach_section_animation(&mut self, section: NodeId, index: usize) -> Result<()> {
        self.dom.style_set(section, "opacity", "0")?;
        self.dom.style_set(section, "transform", "translateY(30px)")?;
        let delay = self.config.timings.section_stagger_ms * index as i64;
        self.set_timeout(delay, section, TimerAction::RevealSection);
        Ok(())
    }

    pub(super) fn reveal_section(&mut self, section: NodeId) -> Result<()> {
        let duration = self.config.timings.section_transition_ms;
        self.dom.style_set(section, "transition", &transition(duration))?;
        self.dom.style_set(section, "opacity", "1")?;
        self.dom.style_set(section, "transform", "translateY(0)")?;
        self.viewport.unobserve(section);
        Ok(())
    }

    /// The observer got there before the stagger timer.
    pub(super) fn reveal_section_in_view(&mut self, section: NodeId) -> Result<()> {
        self.dom.style_set(section, "opacity", "1")?;
        self.dom.style_set(section, "transform", "translateY(0)")?;
        self.scheduler
            .cancel_for_target(section, |action| *action == TimerAction::RevealSection);
        self.viewport.unobserve(section);
        self.trace_enhancer_line(format!(
            "[enhancer] section revealed by viewport {}",
            self.trace_node_label(section)
        ));
        Ok(())
    }

    pub(super) fn init_table_animations(&mut self) -> Result<()> {
        let rows = self.dom.query_selector_all("tbody tr")?;
        self.trace_pass("table row animations", rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            self.attach_row_animation(row, index)?;
        }
        Ok(())
    }

    pub(super) fn attach_row_animation(&mut self, row: NodeId, index: usize) -> Result<()> {
        self.dom.style_set(row, "opacity", "0")?;
        self.dom.style_set(row, "transform", "translateX(-20px)")?;
        let delay = self.config.timings.row_stagger_ms * index as i64;
        self.set_timeout(delay, row, TimerAction::RevealRow);
        Ok(())
    }

    pub(super) fn reveal_row(&mut self, row: NodeId) -> Result<()> {
        let duration = self.config.timings.row_transition_ms;
        self.dom.style_set(row, "transition", &transition(duration))?;
        self.dom.style_set(row, "opacity", "1")?;
        self.dom.style_set(row, "transform", "translateX(0)")
    }

    pub(super) fn init_button_effects(&mut self) -> Result<()> {
        let selector = self.config.button_selector.clone();
        let buttons = self.dom.query_selector_all(&selector)?;
        self.trace_pass("button effects", buttons.len());
        for button in buttons {
            self.listen(button, "mouseenter", Handler::LiftButton);
            self.listen(button, "mouseleave", Handler::RestButton);
            self.listen(button, "mousedown", Handler::PulseButton);
            self.listen(button, "animationend", Handler::SettlePulse);
        }
        Ok(())
    }
}
