use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::event::CalendarEvent;
use crate::model::task::Task;
use crate::repository::traits::{EventRepository, TaskRepository};

const TASKS_FILE_NAME: &str = "tasks.json";
const EVENTS_FILE_NAME: &str = "events.json";

/// Resolves the data directory, defaulting to `~/.voxtask`, and makes sure it exists.
pub fn data_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?
            .join(".voxtask"),
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Could not create data directory {}", path.display()))?;
    Ok(path)
}

/// A JSON array of records kept in a single file.
#[derive(Clone)]
struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    fn open<T: Serialize>(base_dir: Option<PathBuf>, file_name: &str) -> Result<Self> {
        let path = data_dir(base_dir)?.join(file_name);
        let file = JsonFile { path };
        if !file.path.exists() {
            file.write::<T>(&[])?;
        }
        Ok(file)
    }

    fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Could not open {}", self.path.display()))?;
        let records = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed store {}", self.path.display()))?;
        Ok(records)
    }

    fn write<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    fn append<T: Serialize>(&self, record: &T) -> Result<()> {
        let mut records: Vec<serde_json::Value> = self.read()?;
        records.push(serde_json::to_value(record)?);
        self.write(&records)
    }
}

#[derive(Clone)]
pub struct FileTaskRepository {
    store: JsonFile,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        Ok(Self { store: JsonFile::open::<Task>(base_dir, TASKS_FILE_NAME)? })
    }
}

impl TaskRepository for FileTaskRepository {
    fn create(&self, task: Task) -> Result<Task> {
        self.store.append(&task)?;
        Ok(task)
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.store.read()
    }
}

#[derive(Clone)]
pub struct FileEventRepository {
    store: JsonFile,
}

impl FileEventRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        Ok(Self { store: JsonFile::open::<CalendarEvent>(base_dir, EVENTS_FILE_NAME)? })
    }
}

impl EventRepository for FileEventRepository {
    fn create(&self, event: CalendarEvent) -> Result<CalendarEvent> {
        self.store.append(&event)?;
        Ok(event)
    }

    fn list(&self) -> Result<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self.store.read()?;
        events.sort_by_key(|e| e.start);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    #[test]
    fn test_new_store_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.list().unwrap().is_empty());
        let raw = fs::read_to_string(dir.path().join(TASKS_FILE_NAME)).unwrap();
        assert_eq!(raw.trim(), "[]");
    }

    #[test]
    fn test_tasks_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let created = repo.create(Task::new("купить молоко".to_string())).unwrap();

        let reopened = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let tasks = reopened.list().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0], created);
    }

    #[test]
    fn test_events_listed_by_start() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEventRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let later = DateTime::parse_from_rfc3339("2026-10-21T10:00:00+03:00").unwrap();
        let earlier = DateTime::parse_from_rfc3339("2026-10-19T10:00:00+03:00").unwrap();

        repo.create(CalendarEvent::new("primary", "b", later, Duration::hours(1), "Europe/Moscow")).unwrap();
        repo.create(CalendarEvent::new("primary", "a", earlier, Duration::hours(1), "Europe/Moscow")).unwrap();

        let summaries: Vec<String> = repo.list().unwrap().into_iter().map(|e| e.summary).collect();
        assert_eq!(summaries, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_store_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(dir.path().join(TASKS_FILE_NAME), "not json").unwrap();
        assert!(repo.list().is_err());
    }
}
