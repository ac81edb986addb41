//! In-memory task tracking core: observable task records, enablement-aware
//! commands and a controller that keeps a filtered view of its tasks.

pub mod command;
pub mod config;
pub mod controller;
pub mod dialogs;
pub mod error;
pub mod filter;
pub mod model;
pub mod observable;
pub mod view_model;

pub use command::Command;
pub use controller::TaskListController;
pub use error::AppError;
pub use model::{Task, TaskId, TaskPriority, TaskStatus};
pub use view_model::{CommandKind, TaskListViewModel};
