/// Text-input collaborator. `None` means the user cancelled.
pub trait TextPrompt {
    fn prompt_text(&mut self, message: &str, title: &str, default: &str) -> Option<String>;
}

/// Yes/no collaborator used before destructive operations.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Everything the task commands need from the user interface.
pub trait Dialogs: TextPrompt + Confirm {}

impl<T: TextPrompt + Confirm> Dialogs for T {}

/// Cancels every prompt and declines every confirmation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CancelAll;

impl TextPrompt for CancelAll {
    fn prompt_text(&mut self, _message: &str, _title: &str, _default: &str) -> Option<String> {
        None
    }
}

impl Confirm for CancelAll {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}


#[cfg(test)]
mod tests {
    use super::{CancelAll, Confirm, TextPrompt};

    #[test]
    fn cancel_all_declines_everything() {
        let mut dialogs = CancelAll;
        assert_eq!(dialogs.prompt_text("Title?", "New task", "New task"), None);
        assert!(!dialogs.confirm("Delete?"));
    }
}
