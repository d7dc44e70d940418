use serde::Serialize;

use crate::model::event::CalendarEvent;
use crate::model::task::Task;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    Created { event: CalendarEvent },
    /// No start time was resolved, so no event was attempted.
    Skipped,
    Failed { error: String },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Task and event were both created.
    Completed,
    /// Task was created and there was no date for the calendar.
    TaskOnly,
    CalendarFailed,
    TaskFailed,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub task: Result<Task, String>,
    pub event: EventOutcome,
    pub status: DispatchStatus,
}

impl DispatchReport {
    pub fn new(task: Result<Task, String>, event: EventOutcome) -> Self {
        let status = match (&task, &event) {
            (Err(_), _) => DispatchStatus::TaskFailed,
            (Ok(_), EventOutcome::Created { .. }) => DispatchStatus::Completed,
            (Ok(_), EventOutcome::Skipped) => DispatchStatus::TaskOnly,
            (Ok(_), EventOutcome::Failed { .. }) => DispatchStatus::CalendarFailed,
        };
        Self { task, event, status }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, DispatchStatus::Completed | DispatchStatus::TaskOnly)
    }
}
