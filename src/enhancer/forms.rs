use super::{EnrollmentDecision, Handler, Severity, TimerAction, seconds};
use crate::dom::NodeId;
use crate::events::EventState;
use crate::page::Page;
use crate::Result;

const REQUIRED_FIELDS: &str = "input[required], select[required]";
const LOADING_MARKUP: &str = r#"<span class="loading"></span> Processing..."#;
const INVALID_BORDER: &str = "var(--ferrari-red)";
const VALID_BORDER: &str = "var(--success-green)";
const NEUTRAL_BORDER: &str = "#ddd";

impl Page {
    pub(super) fn init_form_validations(&mut self) -> Result<()> {
        let forms = self.dom.query_selector_all("form")?;
        self.trace_pass("form validation", forms.len());
        for form in forms {
            self.listen(form, "submit", Handler::ValidateRequiredFields);
        }
        Ok(())
    }

    /// Blocks the submit while any required field is blank; otherwise locks
    /// the submit button into its loading state.
    pub(super) fn validate_required_fields(
        &mut self,
        form: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        let shake = format!("shake {}", seconds(self.config.timings.shake_ms));
        let mut valid = true;

        for field in self.dom.query_selector_all_from(form, REQUIRED_FIELDS)? {
            if self.dom.value(field)?.trim().is_empty() {
                valid = false;
                self.dom.style_set(field, "border-color", INVALID_BORDER)?;
                self.dom.style_set(field, "animation", &shake)?;
                self.set_timeout(self.config.timings.shake_ms, field, TimerAction::ClearShake);
            } else {
                self.dom.style_set(field, "border-color", NEUTRAL_BORDER)?;
            }
        }

        if !valid {
            event.prevent_default();
            return self.show_notification("Please fill in all required fields", Severity::Error);
        }

        let opt_out = self.config.loading_opt_out_attr.clone();
        if self.dom.has_attr(form, &opt_out) {
            return Ok(());
        }
        if let Some(button) = self
            .dom
            .query_selector_from(form, r#"button[type="submit"]"#)?
        {
            self.dom.set_attr(button, "disabled", "true")?;
            self.dom.set_inner_html(button, LOADING_MARKUP)?;
        }
        Ok(())
    }

    pub(super) fn init_confirmation_dialogs(&mut self) -> Result<()> {
        let bindings = [
            (
                r#"form[action*="/approve"] button"#,
                Handler::ConfirmEnrollmentDecision(EnrollmentDecision::Approve),
            ),
            (
                r#"form[action*="/reject"] button"#,
                Handler::ConfirmEnrollmentDecision(EnrollmentDecision::Reject),
            ),
            (
                r#"form[action*="/grade"] button"#,
                Handler::ConfirmGradeSubmission,
            ),
        ];
        for (selector, handler) in bindings {
            let buttons = self.dom.query_selector_all(selector)?;
            self.trace_pass(selector, buttons.len());
            for button in buttons {
                self.listen(button, "click", handler.clone());
            }
        }
        Ok(())
    }

    pub(super) fn confirm_enrollment_decision(
        &mut self,
        decision: EnrollmentDecision,
        event: &mut EventState,
    ) {
        let message = match decision {
            EnrollmentDecision::Approve => "Are you sure you want to APPROVE this enrollment?",
            EnrollmentDecision::Reject => "Are you sure you want to REJECT this enrollment?",
        };
        if !self.confirm(message) {
            event.prevent_default();
        }
    }

    pub(super) fn confirm_grade_submission(
        &mut self,
        button: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        let Some(form) = self.dom.closest(button, "form")? else {
            return Ok(());
        };
        // Without a grade field there is nothing to confirm.
        let Some(grade_input) = self
            .dom
            .query_selector_from(form, r#"input[name="grade"]"#)?
        else {
            return Ok(());
        };

        let grade = self.dom.value(grade_input)?;
        if grade.is_empty() {
            event.prevent_default();
            return self.show_notification("Please enter a grade", Severity::Error);
        }

        let passed = match self
            .dom
            .query_selector_from(form, r#"select[name="passed"]"#)?
        {
            Some(select) => self.dom.value(select)? == "true",
            None => false,
        };
        let verdict = if passed { "PASSED" } else { "FAILED" };
        if !self.confirm(&format!("Submit grade {grade} ({verdict})?")) {
            event.prevent_default();
        }
        Ok(())
    }

    /// Wires the live range check on every grade field. Safe to call again;
    /// fields already wired are left alone.
    pub fn init_grade_validation(&mut self) -> Result<()> {
        let inputs = self.dom.query_selector_all(r#"input[name="grade"]"#)?;
        self.trace_pass("grade validation", inputs.len());
        for input in inputs {
            self.listen(input, "input", Handler::CheckGradeInput);
        }
        Ok(())
    }

    /// A blank field clears the border and leaves the verdict alone.
    pub(super) fn check_grade_input(&mut self, input: NodeId) -> Result<()> {
        let raw = self.dom.value(input)?;
        if raw.trim().is_empty() {
            return self.dom.style_set(input, "border-color", "");
        }

        let grade = parse_float_prefix(&raw).filter(|value| (0.0..=100.0).contains(value));
        let Some(grade) = grade else {
            self.dom.style_set(input, "border-color", INVALID_BORDER)?;
            return self.show_notification("Grade must be between 0 and 100", Severity::Error);
        };

        self.dom.style_set(input, "border-color", VALID_BORDER)?;
        let Some(form) = self.dom.closest(input, "form")? else {
            return Ok(());
        };
        if let Some(select) = self
            .dom
            .query_selector_from(form, r#"select[name="passed"]"#)?
        {
            let passed = if grade >= 50.0 { "true" } else { "false" };
            self.dom.set_select_value(select, passed)?;
        }
        Ok(())
    }
}

/// Longest numeric prefix of `src` after leading whitespace, the way browsers
/// read a number typed into a text field (`"72.5abc"` is 72.5, `"abc"` is
/// nothing).
pub(crate) fn parse_float_prefix(src: &str) -> Option<f64> {
    let trimmed = src.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if trimmed[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}
