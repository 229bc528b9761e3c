use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::enhancer::ObserverCallback;
use crate::page::Page;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct IntersectionObserver {
    pub(crate) id: usize,
    pub(crate) threshold: f64,
    pub(crate) targets: Vec<NodeId>,
    pub(crate) callback: ObserverCallback,
}

/// Visibility ratios reported for elements plus the observers watching them.
/// Elements with no reported ratio are treated as fully outside the viewport.
#[derive(Debug, Default)]
pub(crate) struct ViewportState {
    pub(crate) observers: Vec<IntersectionObserver>,
    pub(crate) ratios: HashMap<NodeId, f64>,
    next_observer_id: usize,
}

impl ViewportState {
    pub(crate) fn create_observer(&mut self, threshold: f64, callback: ObserverCallback) -> usize {
        self.next_observer_id += 1;
        let id = self.next_observer_id;
        self.observers.push(IntersectionObserver {
            id,
            threshold,
            targets: Vec::new(),
            callback,
        });
        id
    }

    pub(crate) fn observe(&mut self, observer_id: usize, target: NodeId) {
        if let Some(observer) = self.observers.iter_mut().find(|o| o.id == observer_id) {
            if !observer.targets.contains(&target) {
                observer.targets.push(target);
            }
        }
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) {
        for observer in &mut self.observers {
            observer.targets.retain(|node| *node != target);
        }
    }

    pub(crate) fn unobserve_subtree(&mut self, dom: &Dom, root: NodeId) {
        for observer in &mut self.observers {
            observer
                .targets
                .retain(|node| *node != root && !dom.is_descendant_of(*node, root));
        }
    }

    pub(crate) fn ratio(&self, target: NodeId) -> f64 {
        self.ratios.get(&target).copied().unwrap_or(0.0)
    }

    /// Callbacks whose threshold the target currently meets.
    pub(crate) fn intersecting_callbacks(&self, target: NodeId) -> Vec<ObserverCallback> {
        let ratio = self.ratio(target);
        if ratio <= 0.0 {
            return Vec::new();
        }
        self.observers
            .iter()
            .filter(|observer| observer.targets.contains(&target) && ratio >= observer.threshold)
            .map(|observer| observer.callback.clone())
            .collect()
    }
}

impl Page {
    /// Reports how much of the element is visible (0.0 to 1.0) and runs the
    /// observers that consider it intersecting.
    pub fn set_intersection_ratio(&mut self, selector: &str, ratio: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::Runtime(format!(
                "intersection ratio must be within [0, 1], got {ratio}"
            )));
        }
        let target = self.select_one(selector)?;
        self.viewport.ratios.insert(target, ratio);
        self.notify_observers(target)
    }

    pub fn scroll_into_view(&mut self, selector: &str) -> Result<()> {
        self.set_intersection_ratio(selector, 1.0)
    }

    pub(crate) fn observe_element(&mut self, observer_id: usize, target: NodeId) -> Result<()> {
        self.viewport.observe(observer_id, target);
        // An element already on screen is reported as soon as it is observed.
        self.notify_observers(target)
    }

    fn notify_observers(&mut self, target: NodeId) -> Result<()> {
        for callback in self.viewport.intersecting_callbacks(target) {
            self.run_observer_callback(target, &callback)?;
        }
        Ok(())
    }
}
