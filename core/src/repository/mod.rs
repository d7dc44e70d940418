pub mod file;
pub mod traits;

// Re-export
pub use file::{data_dir, FileEventRepository, FileTaskRepository};
pub use traits::{EventRepository, TaskRepository};
