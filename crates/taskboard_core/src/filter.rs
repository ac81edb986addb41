use crate::model::{Task, TaskId, TaskStatus};

/// Search and status constraints that derive the visible task list.
///
/// The view is rebuilt by a full linear scan on every change; the task
/// volume is small enough that an incremental index buys nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub search: String,
}

impl TaskFilter {
    pub fn new(status: Option<TaskStatus>, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status() != status
        {
            return false;
        }

        if self.search.trim().is_empty() {
            return true;
        }

        let needle = fold(&self.search);
        contains_folded(task.title(), &needle) || contains_folded(task.description(), &needle)
    }

    /// Ids of the matching tasks, in the order they appear in `tasks`.
    pub fn apply(&self, tasks: &[Task]) -> Vec<TaskId> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .map(Task::id)
            .collect()
    }
}

/// Ordinal case-insensitive folding: each char maps on its own to its simple
/// uppercase form. Mappings that expand (`ß` to `SS`) leave the char as is, so
/// the folded text keeps one char per input char.
fn fold(text: &str) -> Vec<char> {
    text.chars().map(fold_char).collect()
}

fn fold_char(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

fn contains_folded(haystack: &str, folded_needle: &[char]) -> bool {
    if folded_needle.is_empty() {
        return true;
    }

    let folded = fold(haystack);
    folded
        .windows(folded_needle.len())
        .any(|window| window == folded_needle)
}

#[cfg(test)]
mod tests {
    use super::TaskFilter;
    use crate::model::{Task, TaskId, TaskPriority, TaskStatus};
    use time::OffsetDateTime;

    fn task(id: u64, title: &str, description: &str, status: TaskStatus) -> Task {
        Task::new(
            TaskId::new(id),
            title.to_string(),
            description.to_string(),
            TaskPriority::Medium,
            status,
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, "Изучить WPF", "Основы XAML", TaskStatus::Active),
            task(2, "Write report", "quarterly numbers", TaskStatus::Active),
            task(3, "Prepare interview", "review the REPORT template", TaskStatus::Completed),
        ]
    }

    fn ids(values: &[u64]) -> Vec<TaskId> {
        values.iter().copied().map(TaskId::new).collect()
    }

    #[test]
    fn empty_filter_is_identity_projection() {
        let tasks = fixture();
        assert_eq!(TaskFilter::default().apply(&tasks), ids(&[1, 2, 3]));
    }

    #[test]
    fn empty_task_list_yields_empty_view() {
        assert!(TaskFilter::new(None, "anything").apply(&[]).is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let tasks = fixture();
        let upper = TaskFilter::new(None, "WPF").apply(&tasks);
        let lower = TaskFilter::new(None, "wpf").apply(&tasks);

        assert_eq!(upper, ids(&[1]));
        assert_eq!(upper, lower);
        assert_eq!(TaskFilter::new(None, "изучить").apply(&tasks), ids(&[1]));
    }

    #[test]
    fn search_folds_each_char_without_context() {
        let tasks = vec![
            task(1, "ΟΔΟΣ", "", TaskStatus::Active),
            task(2, "İstanbul trip", "", TaskStatus::Active),
            task(3, "Straße sweep", "", TaskStatus::Active),
        ];

        assert_eq!(TaskFilter::new(None, "Σ").apply(&tasks), ids(&[1]));
        assert_eq!(TaskFilter::new(None, "σ").apply(&tasks), ids(&[1]));
        assert_eq!(TaskFilter::new(None, "οδος").apply(&tasks), ids(&[1]));
        assert_eq!(TaskFilter::new(None, "İstanbul").apply(&tasks), ids(&[2]));
        assert_eq!(TaskFilter::new(None, "TRIP").apply(&tasks), ids(&[2]));
        assert_eq!(TaskFilter::new(None, "straße").apply(&tasks), ids(&[3]));
        assert!(TaskFilter::new(None, "strasse").apply(&tasks).is_empty());
    }

    #[test]
    fn search_matches_title_or_description() {
        let tasks = fixture();
        assert_eq!(TaskFilter::new(None, "report").apply(&tasks), ids(&[2, 3]));
        assert_eq!(TaskFilter::new(None, "xaml").apply(&tasks), ids(&[1]));
    }

    #[test]
    fn whitespace_search_does_not_filter() {
        let tasks = fixture();
        assert_eq!(TaskFilter::new(None, "   ").apply(&tasks), ids(&[1, 2, 3]));
    }

    #[test]
    fn search_without_match_yields_empty_view() {
        let tasks = fixture();
        assert!(TaskFilter::new(None, "groceries").apply(&tasks).is_empty());
    }

    #[test]
    fn status_and_search_compose_with_and() {
        let tasks = fixture();
        let active = TaskFilter::new(Some(TaskStatus::Active), "report");
        let completed = TaskFilter::new(Some(TaskStatus::Completed), "report");

        assert_eq!(active.apply(&tasks), ids(&[2]));
        assert_eq!(completed.apply(&tasks), ids(&[3]));
        assert_eq!(
            TaskFilter::new(Some(TaskStatus::Completed), "").apply(&tasks),
            ids(&[3])
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let tasks = fixture();
        let filter = TaskFilter::new(Some(TaskStatus::Active), "r");
        let first = filter.apply(&tasks);

        let kept: Vec<Task> = tasks
            .into_iter()
            .filter(|task| first.contains(&task.id()))
            .collect();
        assert_eq!(filter.apply(&kept), first);
    }
}
