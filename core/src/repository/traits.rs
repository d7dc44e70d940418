use crate::model::event::CalendarEvent;
use crate::model::task::Task;
use anyhow::Result;

/// Where to-do items go. Receives only a title, never a date.
pub trait TaskRepository {
    fn create(&self, task: Task) -> Result<Task>;
    fn list(&self) -> Result<Vec<Task>>;
}

/// Where timed calendar events go.
pub trait EventRepository {
    fn create(&self, event: CalendarEvent) -> Result<CalendarEvent>;
    fn list(&self) -> Result<Vec<CalendarEvent>>;
}
