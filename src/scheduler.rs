use crate::{Error, Result};

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    id: i64,
    due_at: i64,
    order: i64,
    task: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
}

/// Virtual clock plus one-shot timer queue. Tasks run in `(due_at, order)`
/// order; the clock never moves on its own.
#[derive(Debug)]
pub(crate) struct Scheduler<T> {
    task_queue: Vec<ScheduledTask<T>>,
    now_ms: i64,
    timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
}

impl<T> Scheduler<T> {
    pub(crate) fn new(timer_step_limit: usize) -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: timer_step_limit.max(1),
            next_timer_id: 1,
            next_task_order: 0,
        }
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub(crate) fn timer_step_limit(&self) -> usize {
        self.timer_step_limit
    }

    pub(crate) fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Timer(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.timer_step_limit = max_steps;
        Ok(())
    }

    pub(crate) fn schedule(&mut self, delay_ms: i64, task: T) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        self.task_queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms.max(0)),
            order,
            task,
        });
        id
    }

    pub(crate) fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    /// Moves the clock forward without running anything. Callers drain the
    /// due tasks with [`Scheduler::pop_due`].
    pub(crate) fn advance_clock(&mut self, delta_ms: i64) -> Result<i64> {
        if delta_ms < 0 {
            return Err(Error::Timer(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        Ok(self.now_ms)
    }

    pub(crate) fn advance_clock_to(&mut self, target_ms: i64) -> Result<i64> {
        if target_ms < self.now_ms {
            return Err(Error::Timer(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        self.now_ms = target_ms;
        Ok(self.now_ms)
    }

    pub(crate) fn has_due(&self, due_limit: Option<i64>) -> bool {
        self.next_task_index(due_limit).is_some()
    }

    /// Removes the next task due at or before `due_limit` (any task when
    /// `None`), advancing the clock to its due time when it lies ahead.
    pub(crate) fn pop_due(&mut self, due_limit: Option<i64>) -> Option<(PendingTimer, T)> {
        let next_idx = self.next_task_index(due_limit)?;
        let task = self.task_queue.remove(next_idx);
        if task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some((
            PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            },
            task.task,
        ))
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .next_task_index(due_limit)
            .and_then(|idx| self.task_queue.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},order={}",
                    task.id, task.due_at, task.order
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Timer(format!(
            "flush exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={}, pending_tasks={}, next_task={}",
            self.timer_step_limit,
            self.now_ms,
            due_limit_desc,
            self.task_queue.len(),
            next_task_desc
        ))
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }
}
