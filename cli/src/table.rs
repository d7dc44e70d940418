use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;
use voxtask_core::{CalendarEvent, Task};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Calendar")]
    calendar: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let rows = tasks.iter().map(|t| TaskRow {
        id: short_id(&t.id.to_string()),
        created: t.created_at.format(DATE_FORMAT).to_string(),
        name: t.name.clone(),
    });
    styled(Table::new(rows))
}

pub fn render_events(events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let rows = events.iter().map(|e| EventRow {
        start: e.start.format(DATE_FORMAT).to_string(),
        end: e.end.format(DATE_FORMAT).to_string(),
        calendar: e.calendar_id.clone(),
        summary: e.summary.clone(),
    });
    styled(Table::new(rows))
}
