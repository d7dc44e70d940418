pub mod config;
pub mod input;
pub mod model;
pub mod numerals;
pub mod repository;
pub mod segment;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Settings;
pub use model::event::CalendarEvent;
pub use model::intent::{CommandIntent, TemporalValue};
pub use model::task::Task;
pub use repository::{EventRepository, FileEventRepository, FileTaskRepository, TaskRepository};
pub use input::{clean_date_expression, clean_task_title, normalize};
pub use numerals::{inject_year, preprocess, rewrite_numerals};
pub use segment::{segment, ExtractionRule, RuleRole, Segment, Utterance};
pub use time::{parse_duration, DateParser, ResolutionError, RuDateParser, TemporalResolver};
pub use service::dispatch_service::DispatchService;
pub use service::dto::{DispatchReport, DispatchStatus, EventOutcome};
pub use usecase::interpret::{extract_task_and_date, CommandInterpreter};
