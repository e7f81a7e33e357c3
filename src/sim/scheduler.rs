//! One-shot deferred tasks
//!
//! Fades, cascade steps and ripple cleanup are queued here against the engine
//! clock instead of host timers. Tasks are keyed by entity id so a reset can
//! cancel everything still aimed at the cleared pool; the engine also checks
//! liveness when a task fires.

/// Deferred work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Drop a faded-out entity
    Dispose { id: u32 },
    /// Recolor one entity as part of a color wave
    CascadeColor { id: u32 },
    /// Clear the temporary wave pulse
    EndWavePulse { id: u32 },
    /// Remove a finished ripple
    RippleCleanup { ripple: u32 },
}

impl Task {
    /// Entity this task mutates, if any
    pub fn entity(&self) -> Option<u32> {
        match *self {
            Task::Dispose { id } | Task::CascadeColor { id } | Task::EndWavePulse { id } => Some(id),
            Task::RippleCleanup { .. } => None,
        }
    }

    /// Task changes a live entity (as opposed to cleaning up after one)
    fn touches_live_entity(&self) -> bool {
        matches!(self, Task::CascadeColor { .. } | Task::EndWavePulse { .. })
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    /// Insertion order breaks ties
    seq: u64,
    task: Task,
}

/// Time-ordered queue of pending tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, task: Task) {
        self.pending.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Remove and return every task due at or before `now_ms`, earliest first
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<(f64, Task)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| (s.due_ms, s.task)).collect()
    }

    /// Cancel cascade and wave-pulse tasks aimed at `ids`. Disposal tasks are kept.
    pub fn cancel_for(&mut self, ids: &[u32]) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| {
            !(s.task.touches_live_entity() && s.task.entity().is_some_and(|id| ids.contains(&id)))
        });
        before - self.pending.len()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|s| s.due_ms).min_by(f64::total_cmp)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_order() {
        let mut s = Scheduler::new();
        s.schedule(100.0, Task::CascadeColor { id: 2 });
        s.schedule(50.0, Task::CascadeColor { id: 1 });
        s.schedule(100.0, Task::EndWavePulse { id: 2 });
        s.schedule(500.0, Task::Dispose { id: 9 });

        assert!(s.pop_due(10.0).is_empty());
        let due = s.pop_due(100.0);
        assert_eq!(
            due.iter().map(|(_, t)| *t).collect::<Vec<_>>(),
            vec![
                Task::CascadeColor { id: 1 },
                Task::CascadeColor { id: 2 },
                Task::EndWavePulse { id: 2 },
            ]
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_due(), Some(500.0));
    }

    #[test]
    fn test_cancel_keeps_disposal() {
        let mut s = Scheduler::new();
        s.schedule(10.0, Task::CascadeColor { id: 1 });
        s.schedule(10.0, Task::EndWavePulse { id: 1 });
        s.schedule(10.0, Task::CascadeColor { id: 2 });
        s.schedule(10.0, Task::Dispose { id: 1 });
        s.schedule(10.0, Task::RippleCleanup { ripple: 0 });

        assert_eq!(s.cancel_for(&[1]), 2);
        let left: Vec<Task> = s.pop_due(10.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            left,
            vec![
                Task::CascadeColor { id: 2 },
                Task::Dispose { id: 1 },
                Task::RippleCleanup { ripple: 0 },
            ]
        );
        assert!(s.is_empty());
    }
}
