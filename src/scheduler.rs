//! Cooperative periodic task table.
//!
//! The run loop polls [`Scheduler::due_tasks`] once per iteration and
//! dispatches the returned task ids in order. Execution is run-to-completion
//! and single-threaded; tasks have fixed periods and a closed identity enum,
//! so there is no callback rebinding anywhere.
//!
//! Scheduling rules:
//!
//! - tasks whose due times coincide run in registration order
//! - a task that missed several periods runs once and is rescheduled from
//!   the poll that ran it (missed deadlines collapse)
//! - enabling a task whose due time has passed runs it on the next poll
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::scheduler::{Scheduler, TaskId};
//!
//! let mut scheduler: Scheduler = Scheduler::new();
//! scheduler.register(TaskId::Heartbeat, 300, true).unwrap();
//! scheduler.register(TaskId::GateRefresh, 20, false).unwrap();
//!
//! // Only the enabled task comes due.
//! let due = scheduler.due_tasks(0);
//! assert_eq!(due.as_slice(), &[TaskId::Heartbeat]);
//! ```

use heapless::Vec;

/// Capacity of the default task table.
pub const MAX_TASKS: usize = 8;

/// Identity of a periodic task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskId {
    /// Status-LED toggle check.
    Heartbeat,
    /// Track-occupancy sensor poll.
    OccupancyPoll,
    /// Light-mode button poll.
    LightButtonPoll,
    /// Warning-light drive while the crossing is active.
    GateRefresh,
}

/// Task registration errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// The task table is full.
    CapacityExceeded,
    /// The id is already registered.
    DuplicateTask,
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchedulerError::CapacityExceeded => write!(f, "task table full"),
            SchedulerError::DuplicateTask => write!(f, "task already registered"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}

#[derive(Clone, Copy, Debug)]
struct TaskSlot {
    id: TaskId,
    period_ms: u32,
    next_due_ms: u64,
    enabled: bool,
}

/// Fixed-capacity periodic task table.
///
/// `N` bounds the number of registered tasks; the default capacity covers
/// the crossing's four tasks with room to spare.
#[derive(Clone, Debug, Default)]
pub struct Scheduler<const N: usize = MAX_TASKS> {
    tasks: Vec<TaskSlot, N>,
}

impl<const N: usize> Scheduler<N> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Registers a task with the given period and initial enable state.
    ///
    /// Registration order is execution order for coincident due times. A
    /// freshly registered, enabled task is due on the first poll.
    pub fn register(
        &mut self,
        id: TaskId,
        period_ms: u32,
        enabled: bool,
    ) -> Result<(), SchedulerError> {
        if self.tasks.iter().any(|t| t.id == id) {
            return Err(SchedulerError::DuplicateTask);
        }
        self.tasks
            .push(TaskSlot {
                id,
                period_ms,
                next_due_ms: 0,
                enabled,
            })
            .map_err(|_| SchedulerError::CapacityExceeded)
    }

    /// Enables or disables a task; unknown ids are ignored.
    ///
    /// Disabling gates future runs only; enabling a task whose due time is
    /// in the past makes it run on the next poll.
    pub fn set_enabled(&mut self, id: TaskId, enabled: bool) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.enabled = enabled;
        }
    }

    /// Whether the task is currently enabled; `false` for unknown ids.
    pub fn is_enabled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id && t.enabled)
    }

    /// The task's registered period.
    pub fn period_ms(&self, id: TaskId) -> Option<u32> {
        self.tasks.iter().find(|t| t.id == id).map(|t| t.period_ms)
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collects the tasks due at `now_ms`, rescheduling each from now.
    ///
    /// The returned order is registration order. Each task appears at most
    /// once per poll.
    pub fn due_tasks(&mut self, now_ms: u64) -> Vec<TaskId, N> {
        let mut due = Vec::new();
        for task in self.tasks.iter_mut() {
            if task.enabled && now_ms >= task.next_due_ms {
                if due.push(task.id).is_ok() {
                    task.next_due_ms = now_ms + u64::from(task.period_ms);
                }
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> Scheduler {
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskId::Heartbeat, 300, true).unwrap();
        scheduler.register(TaskId::OccupancyPoll, 500, true).unwrap();
        scheduler
            .register(TaskId::LightButtonPoll, 1000, true)
            .unwrap();
        scheduler.register(TaskId::GateRefresh, 20, false).unwrap();
        scheduler
    }

    // =========================================================================
    // Registration Tests
    // =========================================================================

    #[test]
    fn register_rejects_duplicates() {
        let mut scheduler: Scheduler = Scheduler::new();
        scheduler.register(TaskId::Heartbeat, 300, true).unwrap();

        assert_eq!(
            scheduler.register(TaskId::Heartbeat, 100, true),
            Err(SchedulerError::DuplicateTask)
        );
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn register_rejects_overflow() {
        let mut scheduler: Scheduler<2> = Scheduler::new();
        scheduler.register(TaskId::Heartbeat, 300, true).unwrap();
        scheduler.register(TaskId::OccupancyPoll, 500, true).unwrap();

        assert_eq!(
            scheduler.register(TaskId::GateRefresh, 20, false),
            Err(SchedulerError::CapacityExceeded)
        );
    }

    #[test]
    fn period_lookup() {
        let scheduler = full_table();
        assert_eq!(scheduler.period_ms(TaskId::OccupancyPoll), Some(500));

        let empty: Scheduler = Scheduler::new();
        assert_eq!(empty.period_ms(TaskId::Heartbeat), None);
    }

    // =========================================================================
    // Due-Time Tests
    // =========================================================================

    #[test]
    fn first_poll_runs_all_enabled_tasks_in_registration_order() {
        let mut scheduler = full_table();

        let due = scheduler.due_tasks(0);
        assert_eq!(
            due.as_slice(),
            &[
                TaskId::Heartbeat,
                TaskId::OccupancyPoll,
                TaskId::LightButtonPoll
            ]
        );
    }

    #[test]
    fn tasks_come_due_at_their_own_periods() {
        let mut scheduler = full_table();
        scheduler.due_tasks(0);

        assert!(scheduler.due_tasks(299).is_empty());
        assert_eq!(scheduler.due_tasks(300).as_slice(), &[TaskId::Heartbeat]);
        assert_eq!(scheduler.due_tasks(500).as_slice(), &[TaskId::OccupancyPoll]);
        assert_eq!(scheduler.due_tasks(600).as_slice(), &[TaskId::Heartbeat]);
    }

    #[test]
    fn coincident_due_times_follow_registration_order() {
        let mut scheduler = full_table();
        scheduler.due_tasks(0);

        // 3000 is a multiple of all three running periods.
        let due = scheduler.due_tasks(3000);
        assert_eq!(
            due.as_slice(),
            &[
                TaskId::Heartbeat,
                TaskId::OccupancyPoll,
                TaskId::LightButtonPoll
            ]
        );
    }

    #[test]
    fn missed_deadlines_collapse_into_one_run() {
        let mut scheduler = full_table();
        scheduler.due_tasks(0);

        // Ten heartbeat periods pass unobserved; one run, rescheduled from
        // the late poll.
        let due = scheduler.due_tasks(3001);
        assert_eq!(due.iter().filter(|id| **id == TaskId::Heartbeat).count(), 1);
        assert!(scheduler.due_tasks(3300).is_empty());
        assert_eq!(scheduler.due_tasks(3301).as_slice(), &[TaskId::Heartbeat]);
    }

    // =========================================================================
    // Enable/Disable Tests
    // =========================================================================

    #[test]
    fn disabled_task_never_comes_due() {
        let mut scheduler = full_table();
        assert!(!scheduler.is_enabled(TaskId::GateRefresh));

        for now in [0u64, 20, 40, 1000] {
            assert!(!scheduler.due_tasks(now).contains(&TaskId::GateRefresh));
        }
    }

    #[test]
    fn enabling_a_past_due_task_runs_it_on_next_poll() {
        let mut scheduler = full_table();
        scheduler.due_tasks(0);

        scheduler.set_enabled(TaskId::GateRefresh, true);
        assert!(scheduler.due_tasks(501).contains(&TaskId::GateRefresh));

        // And from then on at its own period.
        assert!(!scheduler.due_tasks(510).contains(&TaskId::GateRefresh));
        assert!(scheduler.due_tasks(521).contains(&TaskId::GateRefresh));
    }

    #[test]
    fn disable_gates_future_runs_only() {
        let mut scheduler = full_table();
        scheduler.set_enabled(TaskId::GateRefresh, true);
        scheduler.due_tasks(0);

        scheduler.set_enabled(TaskId::GateRefresh, false);
        assert!(!scheduler.due_tasks(20).contains(&TaskId::GateRefresh));
        assert!(!scheduler.due_tasks(40).contains(&TaskId::GateRefresh));
    }

    #[test]
    fn set_enabled_on_unknown_id_is_ignored() {
        let mut scheduler: Scheduler = Scheduler::new();
        scheduler.register(TaskId::Heartbeat, 300, true).unwrap();

        scheduler.set_enabled(TaskId::GateRefresh, true);
        assert!(!scheduler.is_enabled(TaskId::GateRefresh));
        assert!(scheduler.is_enabled(TaskId::Heartbeat));
    }
}
