pub mod event;
pub mod intent;
pub mod task;
