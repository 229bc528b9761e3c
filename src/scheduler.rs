use crate::dom::{Dom, NodeId};
use crate::enhancer::TimerAction;
use crate::page::Page;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) target: NodeId,
    pub(crate) action: TimerAction,
}

/// Snapshot of a queued timer, in run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    /// Short name of the scheduled effect, e.g. `reveal-section`.
    pub action: &'static str,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    pub(crate) next_timer_id: i64,
    pub(crate) next_task_order: i64,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

impl SchedulerState {
    pub(crate) fn schedule(&mut self, delay_ms: i64, target: NodeId, action: TimerAction) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.task_queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms.max(0)),
            order,
            target,
            action,
        });
        id
    }

    pub(crate) fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    /// Drops every task aimed at `node` or anything inside it.
    pub(crate) fn cancel_for_subtree(&mut self, dom: &Dom, node: NodeId) -> Vec<i64> {
        let mut cancelled = Vec::new();
        self.task_queue.retain(|task| {
            let hit = task.target == node || dom.is_descendant_of(task.target, node);
            if hit {
                cancelled.push(task.id);
            }
            !hit
        });
        cancelled
    }

    /// Drops tasks aimed exactly at `node` that match `predicate`.
    pub(crate) fn cancel_for_target(
        &mut self,
        node: NodeId,
        predicate: impl Fn(&TimerAction) -> bool,
    ) -> usize {
        let before = self.task_queue.len();
        self.task_queue
            .retain(|task| !(task.target == node && predicate(&task.action)));
        before - self.task_queue.len()
    }
}

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        let existed = self.scheduler.task_queue.len() != before;
        self.trace_timer_line(format!("[timer] clear id={timer_id} existed={existed}"));
        existed
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.task_queue.len();
        self.scheduler.task_queue.clear();
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                action: task.action.name(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        let target = from.saturating_add(delta_ms);
        let ran = self.run_until(target)?;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} ran_due={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        let from = self.scheduler.now_ms;
        let ran = self.run_until(target_ms)?;
        self.trace_timer_line(format!(
            "[timer] advance_to from={from} to={} ran_due={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    /// Runs every queued task, moving the clock forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(next_idx) = self.scheduler.next_task_index(None) else {
            self.trace_timer_line("[timer] run_next none".into());
            return Ok(false);
        };
        let task = self.scheduler.task_queue.remove(next_idx);
        if task.due_at > self.scheduler.now_ms {
            self.scheduler.now_ms = task.due_at;
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms))?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(ran)
    }

    /// Steps the clock to each due task in turn so chained timers observe the
    /// time they were due at, then settles on `target_ms`.
    fn run_until(&mut self, target_ms: i64) -> Result<usize> {
        let ran = self.run_timer_queue(Some(target_ms))?;
        self.scheduler.now_ms = target_ms;
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.scheduler.next_task_index(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let task = self.scheduler.task_queue.remove(next_idx);
            if task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .scheduler
            .next_task_index(due_limit)
            .and_then(|idx| self.scheduler.task_queue.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},action={}",
                    task.id,
                    task.due_at,
                    task.action.name()
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Runtime(format!(
            "timer queue exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={next_task_desc}",
            self.scheduler.timer_step_limit,
            self.scheduler.now_ms,
            self.scheduler.task_queue.len(),
        ))
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        if self.trace_state.enabled {
            let target_label = self.trace_node_label(task.target);
            self.trace_timer_line(format!(
                "[timer] run id={} due_at={} action={} target={} now_ms={}",
                task.id,
                task.due_at,
                task.action.name(),
                target_label,
                self.scheduler.now_ms
            ));
        }
        // Targets detached by something other than the enhancer are skipped.
        if !self.dom.is_connected(task.target) {
            return Ok(());
        }
        self.run_timer_action(task.target, &task.action)
    }
}
