pub mod cli;
pub mod dialogs;
pub mod logging;
pub mod render;
pub mod shell;
