use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::enhancer::Handler;
use crate::page::Page;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    pub(crate) map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    /// Registering the same handler twice for one type/capture pair is a no-op.
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        let listeners = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        if listeners.contains(&listener) {
            return;
        }
        listeners.push(listener);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }

    /// Drops listeners on `node_id` and on everything inside it.
    pub(crate) fn remove_subtree(&mut self, dom: &Dom, node_id: NodeId) {
        self.map
            .retain(|node, _| *node != node_id && !dom.is_descendant_of(*node, node_id));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) event_phase: EventPhase,
    pub(crate) time_stamp_ms: i64,
    pub(crate) default_prevented: bool,
    pub(crate) bubbles: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId, time_stamp_ms: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            event_phase: EventPhase::AtTarget,
            time_stamp_ms,
            default_prevented: false,
            bubbles: event_bubbles(event_type),
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

fn event_bubbles(event_type: &str) -> bool {
    !matches!(
        event_type,
        "mouseenter" | "mouseleave" | "focus" | "blur" | "load" | "scroll"
    )
}

impl Page {
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let event = EventState::new(event_type, target, self.scheduler.now_ms);
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.dispatch_prepared_event(event))
    }

    fn dispatch_prepared_event(&mut self, mut event: EventState) -> Result<EventState> {
        let target = event.target;
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();
        let ancestors = &path[..path.len().saturating_sub(1)];

        for node in ancestors {
            event.event_phase = EventPhase::Capturing;
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
        }

        event.event_phase = EventPhase::AtTarget;
        event.current_target = target;
        for capture in [true, false] {
            self.invoke_listeners(target, &mut event, capture)?;
        }

        if event.bubbles {
            for node in ancestors.iter().rev() {
                event.event_phase = EventPhase::Bubbling;
                event.current_target = *node;
                self.invoke_listeners(*node, &mut event, false)?;
            }
        }

        self.trace_event_done(&event);
        Ok(event)
    }

    fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        for listener in self.listeners.get(node_id, &event.event_type, capture) {
            if self.trace_state.enabled {
                let target_label = self.trace_node_label(event.target);
                let current_label = self.trace_node_label(event.current_target);
                self.trace_event_line(format!(
                    "[event] {} target={} current={} phase={:?} handler={:?}",
                    event.event_type, target_label, current_label, event.event_phase, listener.handler
                ));
            }
            self.run_handler(&listener.handler, event)?;
        }
        Ok(())
    }

    fn trace_event_done(&mut self, event: &EventState) {
        if !self.trace_state.enabled {
            return;
        }
        let target_label = self.trace_node_label(event.target);
        self.trace_event_line(format!(
            "[event] done {} target={} default_prevented={} at={}",
            event.event_type, target_label, event.default_prevented, event.time_stamp_ms
        ));
    }
}
