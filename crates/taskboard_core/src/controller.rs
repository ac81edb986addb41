use crate::dialogs::Confirm;
use crate::filter::TaskFilter;
use crate::model::{Task, TaskId, TaskPriority, TaskStatus};
use crate::observable::{Observable, PropertyChange, PropertyObservers, SubscriptionId};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Property names the controller reports through its observers.
pub mod property {
    pub const TASKS: &str = "tasks";
    pub const FILTERED_TASKS: &str = "filtered_tasks";
    pub const SELECTED_TASK: &str = "selected_task";
    pub const SEARCH_TEXT: &str = "search_text";
    pub const FILTER_STATUS: &str = "filter_status";
}

/// Sole owner of the task list, the filter state and the selection.
///
/// The filtered view is a cache over `(tasks, search, status filter)` and is
/// rebuilt after every mutation of any of the three. Operations whose
/// preconditions do not hold (no selection, blank title, declined
/// confirmation) do nothing and report `false` / `None`.
#[derive(Debug)]
pub struct TaskListController {
    tasks: Vec<Task>,
    filtered: Vec<TaskId>,
    selected: Option<TaskId>,
    filter: TaskFilter,
    next_id: u64,
    observers: PropertyObservers,
}

impl Default for TaskListController {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskListController {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filtered: Vec::new(),
            selected: None,
            filter: TaskFilter::default(),
            next_id: 1,
            observers: PropertyObservers::new(),
        }
    }

    /// Seeds the list with a handful of demonstration tasks.
    pub fn load_sample_data(&mut self) {
        let samples = [
            (
                "Learn the borrow checker",
                "Ownership, borrowing and lifetimes",
                TaskPriority::High,
                TaskStatus::Active,
            ),
            (
                "Try a terminal UI crate",
                "Install it and build a small demo",
                TaskPriority::High,
                TaskStatus::Active,
            ),
            (
                "Create a test project",
                "A simple CRUD application",
                TaskPriority::Medium,
                TaskStatus::Active,
            ),
            (
                "Prepare for the interview",
                "Review SOLID, DRY, KISS",
                TaskPriority::High,
                TaskStatus::Completed,
            ),
        ];

        for (title, description, priority, status) in samples {
            self.add(title, description, priority, status);
        }
    }

    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        priority: TaskPriority,
        status: TaskStatus,
    ) -> Option<TaskId> {
        let title = title.trim();
        if title.is_empty() {
            debug!("ignoring add with blank title");
            return None;
        }

        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        let task = Task::new(
            id,
            title.to_string(),
            description.trim().to_string(),
            priority,
            status,
            OffsetDateTime::now_utc(),
        );
        info!(task_id = %id, title, "task added");

        self.tasks.push(task);
        self.observers.notify_changed(property::TASKS);
        self.apply_filter();
        Some(id)
    }

    pub fn edit_selected(&mut self, new_title: &str) -> bool {
        let title = new_title.trim();
        if title.is_empty() {
            debug!("ignoring edit with blank title");
            return false;
        }

        let Some(task) = self.selected_task_mut() else {
            debug!("ignoring edit without selection");
            return false;
        };

        let id = task.id();
        if !task.set_title(title.to_string()) {
            return false;
        }

        debug!(task_id = %id, title, "task renamed");
        self.apply_filter();
        true
    }

    pub fn delete_selected(&mut self, confirm: &mut dyn Confirm) -> bool {
        let Some(id) = self.selected else {
            debug!("ignoring delete without selection");
            return false;
        };
        let Some(index) = self.position(id) else {
            return false;
        };

        let message = format!("Delete task '{}'?", self.tasks[index].title());
        if !confirm.confirm(&message) {
            debug!(task_id = %id, "delete declined");
            return false;
        }

        let removed = self.tasks.remove(index);
        info!(task_id = %id, title = removed.title(), "task deleted");

        self.observers.notify_changed(property::TASKS);
        self.observers
            .set_property(&mut self.selected, None, property::SELECTED_TASK);
        self.apply_filter();
        true
    }

    pub fn toggle_selected_status(&mut self) -> bool {
        let Some(task) = self.selected_task_mut() else {
            debug!("ignoring toggle without selection");
            return false;
        };

        let status = task.status().toggled();
        task.set_status(status);
        debug!(task_id = %task.id(), status = status.label(), "task status toggled");

        self.apply_filter();
        true
    }

    pub fn set_filter_status(&mut self, status: Option<TaskStatus>) -> bool {
        if !self
            .observers
            .set_property(&mut self.filter.status, status, property::FILTER_STATUS)
        {
            return false;
        }

        self.apply_filter();
        true
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        if !self
            .observers
            .set_property(&mut self.filter.search, text.into(), property::SEARCH_TEXT)
        {
            return false;
        }

        self.apply_filter();
        true
    }

    /// Changes the selection. Ids that are not in the task list are rejected.
    pub fn select(&mut self, id: Option<TaskId>) -> bool {
        if let Some(id) = id
            && self.position(id).is_none()
        {
            debug!(task_id = %id, "ignoring selection of unknown task");
            return false;
        }

        self.observers
            .set_property(&mut self.selected, id, property::SELECTED_TASK)
    }

    pub fn can_mutate_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn filtered_ids(&self) -> &[TaskId] {
        &self.filtered
    }

    pub fn filtered_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.filtered.iter().filter_map(|id| self.task(*id))
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.task(id))
    }

    pub fn search_text(&self) -> &str {
        &self.filter.search
    }

    pub fn filter_status(&self) -> Option<TaskStatus> {
        self.filter.status
    }

    /// Attaches a listener to one task record.
    pub fn subscribe_task<F>(&mut self, id: TaskId, listener: F) -> Option<SubscriptionId>
    where
        F: FnMut(&PropertyChange) + 'static,
    {
        let index = self.position(id)?;
        Some(self.tasks[index].subscribe(listener))
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn selected_task_mut(&mut self) -> Option<&mut Task> {
        let id = self.selected?;
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    fn apply_filter(&mut self) {
        self.filtered.clear();
        let visible = self.filter.apply(&self.tasks);
        self.filtered.extend(visible);
        debug!(visible = self.filtered.len(), total = self.tasks.len(), "filter applied");
        self.observers.notify_changed(property::FILTERED_TASKS);
    }
}

impl Observable for TaskListController {
    fn observers_mut(&mut self) -> &mut PropertyObservers {
        &mut self.observers
    }
}
