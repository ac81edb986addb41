use crate::command::Command;
use crate::controller::TaskListController;
use crate::dialogs::Dialogs;
use crate::model::{TaskId, TaskPriority, TaskStatus};
use crate::observable::{Observable, PropertyChange, SubscriptionId};
use tracing::{debug, warn};

const DEFAULT_NEW_TITLE: &str = "New task";

/// Context the task commands run against: the controller plus the dialog
/// collaborators used to collect input.
#[derive(Debug)]
pub struct TaskBoard<D> {
    pub controller: TaskListController,
    pub dialogs: D,
    pub default_priority: TaskPriority,
}

pub type TaskCommand<D> = Command<TaskBoard<D>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Add,
    Edit,
    Delete,
    ToggleStatus,
    ShowAll,
    ShowActive,
    ShowCompleted,
}

impl CommandKind {
    pub const ALL: [CommandKind; 7] = [
        CommandKind::Add,
        CommandKind::Edit,
        CommandKind::Delete,
        CommandKind::ToggleStatus,
        CommandKind::ShowAll,
        CommandKind::ShowActive,
        CommandKind::ShowCompleted,
    ];

    /// Whether enablement depends on a task being selected.
    pub fn needs_selection(self) -> bool {
        matches!(
            self,
            CommandKind::Edit | CommandKind::Delete | CommandKind::ToggleStatus
        )
    }
}

#[derive(Debug)]
pub struct TaskCommands<D> {
    add: TaskCommand<D>,
    edit: TaskCommand<D>,
    delete: TaskCommand<D>,
    toggle_status: TaskCommand<D>,
    show_all: TaskCommand<D>,
    show_active: TaskCommand<D>,
    show_completed: TaskCommand<D>,
}

impl<D: Dialogs + 'static> Default for TaskCommands<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialogs + 'static> TaskCommands<D> {
    pub fn new() -> Self {
        Self {
            add: Command::new("add", add_task::<D>),
            edit: Command::new("edit", edit_task::<D>).with_predicate(has_selection::<D>),
            delete: Command::new("delete", delete_task::<D>)
                .with_predicate(has_selection::<D>),
            toggle_status: Command::new("toggle_status", toggle_status::<D>)
                .with_predicate(has_selection::<D>),
            show_all: Command::new("show_all", |board: &mut TaskBoard<D>, _: &()| {
                board.controller.set_filter_status(None);
            }),
            show_active: Command::new("show_active", |board: &mut TaskBoard<D>, _: &()| {
                board.controller.set_filter_status(Some(TaskStatus::Active));
            }),
            show_completed: Command::new("show_completed", |board: &mut TaskBoard<D>, _: &()| {
                board
                    .controller
                    .set_filter_status(Some(TaskStatus::Completed));
            }),
        }
    }
}

impl<D> TaskCommands<D> {
    pub fn get(&self, kind: CommandKind) -> &TaskCommand<D> {
        match kind {
            CommandKind::Add => &self.add,
            CommandKind::Edit => &self.edit,
            CommandKind::Delete => &self.delete,
            CommandKind::ToggleStatus => &self.toggle_status,
            CommandKind::ShowAll => &self.show_all,
            CommandKind::ShowActive => &self.show_active,
            CommandKind::ShowCompleted => &self.show_completed,
        }
    }

    pub fn get_mut(&mut self, kind: CommandKind) -> &mut TaskCommand<D> {
        match kind {
            CommandKind::Add => &mut self.add,
            CommandKind::Edit => &mut self.edit,
            CommandKind::Delete => &mut self.delete,
            CommandKind::ToggleStatus => &mut self.toggle_status,
            CommandKind::ShowAll => &mut self.show_all,
            CommandKind::ShowActive => &mut self.show_active,
            CommandKind::ShowCompleted => &mut self.show_completed,
        }
    }

    /// Tells only the selection-dependent commands to re-evaluate enablement.
    pub fn notify_selection_changed(&mut self) {
        for kind in CommandKind::ALL.into_iter().filter(|kind| kind.needs_selection()) {
            self.get_mut(kind).notify_can_execute_changed();
        }
    }
}

fn has_selection<D>(board: &TaskBoard<D>, _: &()) -> bool {
    board.controller.can_mutate_selected()
}

fn add_task<D: Dialogs>(board: &mut TaskBoard<D>, _: &()) {
    let title = board
        .dialogs
        .prompt_text("Enter task title:", "New task", DEFAULT_NEW_TITLE);
    let Some(title) = title.filter(|value| !value.trim().is_empty()) else {
        debug!("add cancelled");
        return;
    };

    let description = board
        .dialogs
        .prompt_text("Enter task description:", "Description", "")
        .unwrap_or_default();

    let default_priority = board.default_priority;
    let priority = match board.dialogs.prompt_text(
        "Enter priority (low, medium, high):",
        "Priority",
        default_priority.label(),
    ) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.parse::<TaskPriority>().unwrap_or_else(|_| {
                warn!(input = %raw, "unknown priority, using default");
                default_priority
            })
        }
        _ => default_priority,
    };

    board
        .controller
        .add(&title, &description, priority, TaskStatus::Active);
}

fn edit_task<D: Dialogs>(board: &mut TaskBoard<D>, _: &()) {
    let Some(current) = board
        .controller
        .selected_task()
        .map(|task| task.title().to_string())
    else {
        return;
    };

    match board
        .dialogs
        .prompt_text("Enter new title:", "Edit task", &current)
    {
        Some(title) => {
            board.controller.edit_selected(&title);
        }
        None => debug!("edit cancelled"),
    }
}

fn delete_task<D: Dialogs>(board: &mut TaskBoard<D>, _: &()) {
    board.controller.delete_selected(&mut board.dialogs);
}

fn toggle_status<D>(board: &mut TaskBoard<D>, _: &()) {
    board.controller.toggle_selected_status();
}

/// Binds the task commands to a board and keeps command enablement in step
/// with the selection.
#[derive(Debug)]
pub struct TaskListViewModel<D> {
    board: TaskBoard<D>,
    commands: TaskCommands<D>,
}

impl<D: Dialogs + 'static> TaskListViewModel<D> {
    pub fn new(dialogs: D, default_priority: TaskPriority) -> Self {
        Self::with_controller(TaskListController::new(), dialogs, default_priority)
    }

    pub fn with_controller(
        controller: TaskListController,
        dialogs: D,
        default_priority: TaskPriority,
    ) -> Self {
        Self {
            board: TaskBoard {
                controller,
                dialogs,
                default_priority,
            },
            commands: TaskCommands::new(),
        }
    }
}

impl<D> TaskListViewModel<D> {
    pub fn controller(&self) -> &TaskListController {
        &self.board.controller
    }

    pub fn dialogs(&self) -> &D {
        &self.board.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.board.dialogs
    }

    pub fn can_invoke(&self, kind: CommandKind) -> bool {
        self.commands.get(kind).can_execute(&self.board, &())
    }

    /// Runs the command if it is enabled. Returns whether it ran.
    pub fn invoke(&mut self, kind: CommandKind) -> bool {
        let had_selection = self.board.controller.can_mutate_selected();
        let ran = self.commands.get(kind).execute(&mut self.board, &());
        self.sync_enablement(had_selection);
        ran
    }

    pub fn select(&mut self, id: Option<TaskId>) -> bool {
        let had_selection = self.board.controller.can_mutate_selected();
        let changed = self.board.controller.select(id);
        self.sync_enablement(had_selection);
        changed
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        self.board.controller.set_search_text(text)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + 'static,
    {
        self.board.controller.subscribe(listener)
    }

    pub fn subscribe_can_execute_changed<F>(
        &mut self,
        kind: CommandKind,
        listener: F,
    ) -> SubscriptionId
    where
        F: FnMut(&PropertyChange) + 'static,
    {
        self.commands
            .get_mut(kind)
            .subscribe_can_execute_changed(listener)
    }

    fn sync_enablement(&mut self, had_selection: bool) {
        if had_selection != self.board.controller.can_mutate_selected() {
            self.commands.notify_selection_changed();
        }
    }
}
