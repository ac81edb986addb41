use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::config::Palette;
use taskboard_core::{Task, TaskId, TaskListController, TaskStatus};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const EMPTY_VIEW: &str = "No tasks to show.";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: TaskId,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Created")]
    created: String,
}

impl TaskRow {
    fn new(task: &Task, selected: Option<TaskId>) -> Self {
        Self {
            marker: if selected == Some(task.id()) { ">" } else { "" },
            id: task.id(),
            title: task.title().to_string(),
            status: task.status().label(),
            priority: task.priority().label(),
            created: format_timestamp(task.created_at()),
        }
    }
}

/// Creation time in the local offset, falling back to UTC when the offset
/// cannot be determined.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    at.to_offset(offset)
        .format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// The filtered view as a table, with the selected row marked.
pub fn task_table(controller: &TaskListController) -> String {
    let selected = controller.selected_id();
    let rows: Vec<TaskRow> = controller
        .filtered_tasks()
        .map(|task| TaskRow::new(task, selected))
        .collect();

    if rows.is_empty() {
        return EMPTY_VIEW.to_string();
    }

    Table::new(rows).with(Style::psql()).to_string()
}

pub fn task_json(task: &Task) -> Value {
    serde_json::to_value(task).unwrap_or(Value::Null)
}

pub fn view_json(controller: &TaskListController) -> Value {
    json!({
        "filter": filter_label(controller.filter_status()),
        "search": controller.search_text(),
        "selected": controller.selected_id(),
        "tasks": controller.filtered_tasks().map(task_json).collect::<Vec<_>>(),
    })
}

pub fn task_details(task: &Task, palette: &Palette) -> String {
    let description = if task.description().is_empty() {
        palette.mutedize("(no description)")
    } else {
        task.description().to_string()
    };

    [
        format!("{} #{}", palette.accentize(task.title()), task.id()),
        format!("  Status:      {}", task.status().label()),
        format!("  Priority:    {}", task.priority().label()),
        format!("  Created:     {}", format_timestamp(task.created_at())),
        format!("  Description: {description}"),
    ]
    .join("\n")
}

/// One-line summary of the view state shown under the table.
pub fn status_line(controller: &TaskListController, palette: &Palette) -> String {
    let shown = controller.filtered_ids().len();
    let total = controller.tasks().len();
    let mut parts = vec![
        format!("{shown} of {total} shown"),
        format!("filter: {}", filter_label(controller.filter_status())),
    ];

    if !controller.search_text().trim().is_empty() {
        parts.push(format!("search: \"{}\"", controller.search_text()));
    }

    match controller.selected_task() {
        Some(task) => parts.push(format!("selected: #{}", task.id())),
        None => parts.push("nothing selected".to_string()),
    }

    palette.mutedize(&parts.join(" | "))
}

pub fn filter_label(status: Option<TaskStatus>) -> &'static str {
    status.map(TaskStatus::label).unwrap_or("all")
}

#[cfg(test)]
mod tests {
    use super::{filter_label, status_line, task_details, task_json, task_table, view_json};
    use taskboard_core::config::palette_for_theme;
    use taskboard_core::{TaskId, TaskListController, TaskPriority, TaskStatus};

    fn controller() -> TaskListController {
        let mut controller = TaskListController::new();
        controller.add("Buy milk", "2 liters", TaskPriority::High, TaskStatus::Active);
        controller.add("Write report", "", TaskPriority::Low, TaskStatus::Completed);
        controller
    }

    #[test]
    fn table_lists_visible_tasks_and_marks_selection() {
        let mut controller = controller();
        controller.select(Some(TaskId::new(2)));

        let table = task_table(&controller);

        assert!(table.contains("Title"));
        assert!(table.contains("Buy milk"));
        assert!(table.contains("completed"));
        let selected_row = table.lines().find(|line| line.contains("Write report")).unwrap();
        assert!(selected_row.contains('>'));
    }

    #[test]
    fn table_reports_empty_view() {
        let mut controller = controller();
        controller.set_search_text("nothing like this");

        assert_eq!(task_table(&controller), "No tasks to show.");
    }

    #[test]
    fn json_view_carries_filter_state() {
        let mut controller = controller();
        controller.set_filter_status(Some(TaskStatus::Active));

        let value = view_json(&controller);

        assert_eq!(value["filter"], "active");
        assert_eq!(value["selected"], serde_json::Value::Null);
        assert_eq!(value["tasks"].as_array().unwrap().len(), 1);
        assert_eq!(value["tasks"][0]["title"], "Buy milk");
        assert_eq!(value["tasks"][0]["priority"], "high");
    }

    #[test]
    fn task_json_uses_plain_id() {
        let controller = controller();
        let value = task_json(&controller.tasks()[0]);

        assert_eq!(value["id"], 1);
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn details_mark_missing_description() {
        let controller = controller();
        let palette = palette_for_theme(None);

        let details = task_details(&controller.tasks()[1], &palette);

        assert!(details.starts_with("Write report #2"));
        assert!(details.contains("(no description)"));
        assert!(details.contains("Priority:    low"));
    }

    #[test]
    fn status_line_summarises_view() {
        let mut controller = controller();
        controller.set_search_text("milk");
        controller.select(Some(TaskId::new(1)));

        let line = status_line(&controller, &palette_for_theme(None));

        assert_eq!(
            line,
            "1 of 2 shown | filter: all | search: \"milk\" | selected: #1"
        );
        assert_eq!(filter_label(Some(TaskStatus::Completed)), "completed");
    }
}
