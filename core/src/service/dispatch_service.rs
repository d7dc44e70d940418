use anyhow::Result;
use chrono::Duration;

use crate::config::Settings;
use crate::model::event::CalendarEvent;
use crate::model::intent::CommandIntent;
use crate::model::task::Task;
use crate::repository::{EventRepository, TaskRepository};
use crate::service::dto::{DispatchReport, EventOutcome};

/// Forwards interpreted commands to the to-do store and the calendar.
pub struct DispatchService<T: TaskRepository, E: EventRepository> {
    tasks: T,
    events: E,
    calendar_id: String,
    time_zone: String,
    event_duration: Duration,
}

impl<T: TaskRepository, E: EventRepository> DispatchService<T, E> {
    pub fn new(tasks: T, events: E, settings: &Settings) -> Self {
        Self {
            tasks,
            events,
            calendar_id: settings.calendar_id.clone(),
            time_zone: settings.time_zone.name().to_string(),
            event_duration: settings.default_event_duration,
        }
    }

    /// Creates the task, then an event if a start time is known.
    ///
    /// Store failures end up in the report; they never abort the caller.
    pub fn dispatch(&self, intent: &CommandIntent) -> DispatchReport {
        let task = match self.tasks.create(Task::new(intent.task.clone())) {
            Ok(task) => {
                tracing::info!(task = %task.name, id = %task.id, "task created");
                Ok(task)
            }
            Err(err) => {
                tracing::error!(task = %intent.task, error = %err, "task creation failed");
                Err(err.to_string())
            }
        };

        let event = match intent.start() {
            None => {
                tracing::info!(task = %intent.task, "no date given, calendar event skipped");
                EventOutcome::Skipped
            }
            Some(start) => {
                let event = CalendarEvent::new(
                    &self.calendar_id,
                    &intent.task,
                    start,
                    self.event_duration,
                    &self.time_zone,
                );
                match self.events.create(event) {
                    Ok(event) => {
                        tracing::info!(summary = %event.summary, start = %event.start, "calendar event created");
                        EventOutcome::Created { event }
                    }
                    Err(err) => {
                        tracing::error!(task = %intent.task, error = %err, "calendar event failed");
                        EventOutcome::Failed { error: err.to_string() }
                    }
                }
            }
        };

        DispatchReport::new(task, event)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.list()
    }

    pub fn list_events(&self) -> Result<Vec<CalendarEvent>> {
        self.events.list()
    }
}
