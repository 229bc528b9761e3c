use super::{Handler, Severity, TimerAction, transition};
use crate::dom::NodeId;
use crate::page::{Notification, Page};
use crate::Result;

const CLOSE_BUTTON_STYLE: &str = "
    float: right;
    font-size: 24px;
    font-weight: bold;
    cursor: pointer;
    margin-left: 15px;
";

const NOTIFICATION_STYLE: &str = "
    position: fixed;
    top: 80px;
    right: 20px;
    z-index: 10000;
    min-width: 300px;
    animation: slideIn 0.5s ease;
";

impl Page {
    pub(super) fn auto_hide_alerts(&mut self) -> Result<()> {
        let alerts = self.dom.query_selector_all(".alert")?;
        self.trace_pass("alert lifecycle", alerts.len());
        for alert in alerts {
            self.attach_alert_lifecycle(alert)?;
        }
        Ok(())
    }

    fn attach_alert_lifecycle(&mut self, alert: NodeId) -> Result<()> {
        let timings = self.config.timings;
        self.set_timeout(
            timings.alert_auto_hide_ms,
            alert,
            TimerAction::FadeOut {
                fade_ms: timings.alert_fade_ms,
            },
        );

        let close = self.dom.create_detached_element("span");
        self.dom.set_inner_html(close, "&times;")?;
        self.dom.set_css_text(close, CLOSE_BUTTON_STYLE)?;
        self.listen(close, "click", Handler::DismissAlert { alert });
        self.dom.prepend_child(alert, close)
    }

    /// Close-button path. An alert that is already fading keeps its original
    /// schedule.
    pub(super) fn dismiss_alert(&mut self, alert: NodeId) -> Result<()> {
        if self.dismissing.contains(&alert) || !self.dom.is_connected(alert) {
            return Ok(());
        }
        self.scheduler
            .cancel_for_target(alert, |action| matches!(action, TimerAction::FadeOut { .. }));
        let fade_ms = self.config.timings.alert_close_fade_ms;
        self.start_fade(alert, fade_ms)?;
        self.set_timeout(fade_ms, alert, TimerAction::RemoveNode);
        Ok(())
    }

    pub(super) fn fade_out(&mut self, node: NodeId, fade_ms: i64) -> Result<()> {
        if self.dismissing.contains(&node) {
            return Ok(());
        }
        self.start_fade(node, fade_ms)?;
        self.set_timeout(fade_ms, node, TimerAction::RemoveNode);
        Ok(())
    }

    fn start_fade(&mut self, node: NodeId, fade_ms: i64) -> Result<()> {
        self.dismissing.insert(node);
        self.dom.style_set(node, "transition", &transition(fade_ms))?;
        self.dom.style_set(node, "opacity", "0")?;
        self.dom.style_set(node, "transform", "translateX(100%)")
    }

    /// Shows a transient message in the corner of the page. It slides out
    /// and is removed on its own; there is no close button.
    pub fn show_notification(&mut self, message: &str, severity: Severity) -> Result<()> {
        let body = self.dom.body();
        let notification = self.dom.create_detached_element("div");
        self.dom
            .set_attr(notification, "class", &format!("alert alert-{severity}"))?;
        self.dom.set_text_content(notification, message)?;
        self.dom.set_css_text(notification, NOTIFICATION_STYLE)?;
        self.dom.append_child(body, notification)?;

        let timings = self.config.timings;
        self.set_timeout(
            timings.notification_lifetime_ms,
            notification,
            TimerAction::FadeOut {
                fade_ms: timings.notification_fade_ms,
            },
        );

        log::debug!("notification ({severity}): {message}");
        self.trace_enhancer_line(format!(
            "[enhancer] notification severity={severity} message={message:?}"
        ));
        self.notifications.push(Notification {
            message: message.to_string(),
            severity,
        });
        Ok(())
    }
}
