mod task;

pub use task::{Task, TaskId, TaskPriority, TaskStatus, property};
