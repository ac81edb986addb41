use crate::cli::{FilterArg, ShellCommand, ShellLine};
use crate::dialogs::TerminalDialogs;
use crate::render;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde_json::{Value, json};
use std::cell::Cell;
use std::collections::HashMap;
use std::io::BufRead;
use std::rc::Rc;
use taskboard_core::config::{Config, Palette, palette_for_theme};
use taskboard_core::controller::property;
use taskboard_core::{AppError, CommandKind, TaskId, TaskListController, TaskListViewModel};
use tracing::debug;

/// Line-oriented front end over a [`TaskListViewModel`].
///
/// Every line is parsed as a [`ShellLine`]; the matching command is invoked
/// through the view-model. The task table is re-printed whenever the
/// controller reports that the filtered view or the selection changed.
pub struct Shell<R> {
    vm: TaskListViewModel<TerminalDialogs<R>>,
    aliases: HashMap<String, String>,
    palette: Palette,
    json: bool,
    view_dirty: Rc<Cell<bool>>,
    selection_commands_changed: Rc<Cell<bool>>,
}

impl<R: BufRead + 'static> Shell<R> {
    pub fn new(input: R, config: &Config, json: bool) -> Self {
        let mut controller = TaskListController::new();
        if config.sample_data {
            controller.load_sample_data();
        }

        let mut vm = TaskListViewModel::with_controller(
            controller,
            TerminalDialogs::new(input).prompts_on_stderr(json),
            config.default_priority,
        );

        let view_dirty = Rc::new(Cell::new(true));
        let dirty = Rc::clone(&view_dirty);
        vm.subscribe(move |change| {
            if change.property == property::FILTERED_TASKS
                || change.property == property::SELECTED_TASK
            {
                dirty.set(true);
            }
        });

        let selection_commands_changed = Rc::new(Cell::new(false));
        let changed = Rc::clone(&selection_commands_changed);
        vm.subscribe_can_execute_changed(CommandKind::Edit, move |_| changed.set(true));

        Self {
            vm,
            aliases: config.aliases.clone(),
            palette: palette_for_theme(config.theme.as_deref()),
            json,
            view_dirty,
            selection_commands_changed,
        }
    }

    pub fn view_model(&self) -> &TaskListViewModel<TerminalDialogs<R>> {
        &self.vm
    }

    /// Reads and runs lines until `exit`, `quit` or end of input.
    pub fn run(&mut self) -> Result<(), AppError> {
        if !self.json {
            println!("{}", self.palette.mutedize("Type `help` for the list of commands."));
        }
        self.flush_view();

        while let Some(line) = self.vm.dialogs_mut().read_line()? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                break;
            }

            if line == "help" || line == "?" {
                print_help();
                continue;
            }

            if let Err(err) = self.run_line(line) {
                eprintln!("ERROR: {}", err);
            }
            self.vm.dialogs_mut().clear_pending();
            self.flush_view();
        }

        Ok(())
    }

    /// Parses and runs a single line. Help requests are printed, not treated
    /// as failures.
    pub fn run_line(&mut self, line: &str) -> Result<(), AppError> {
        let expanded = expand_alias(line, &self.aliases);
        let args = split_command_line(&expanded)?;
        if args.is_empty() {
            return Ok(());
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskboard".to_string());
        argv.extend(args);

        let parsed = match ShellLine::try_parse_from(argv) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                println!("{}", err);
                return Ok(());
            }
            Err(err) => return Err(normalize_parse_error(err)),
        };

        self.execute(parsed.command)
    }

    fn execute(&mut self, command: ShellCommand) -> Result<(), AppError> {
        match command {
            ShellCommand::Add {
                title,
                description,
                priority,
            } => self.add(title, description, priority.map(|p| p.label().to_string())),
            ShellCommand::Edit { new_title } => self.edit(new_title),
            ShellCommand::Delete { yes } => self.delete(yes),
            ShellCommand::Toggle => self.toggle(),
            ShellCommand::Select { id } => self.select(id),
            ShellCommand::Search { text } => {
                self.vm.set_search_text(text.join(" "));
                Ok(())
            }
            ShellCommand::Filter { status } => {
                let kind = match status {
                    FilterArg::All => CommandKind::ShowAll,
                    FilterArg::Active => CommandKind::ShowActive,
                    FilterArg::Completed => CommandKind::ShowCompleted,
                };
                self.vm.invoke(kind);
                Ok(())
            }
            ShellCommand::List => {
                self.view_dirty.set(true);
                Ok(())
            }
            ShellCommand::Show { id } => self.show(id),
        }
    }

    fn add(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        priority: Option<String>,
    ) -> Result<(), AppError> {
        if title.as_deref().is_some_and(|value| value.trim().is_empty()) {
            return Err(AppError::invalid_input("title is required"));
        }

        // A title on the command line means nothing else is asked for.
        let interactive = title.is_none();
        let fill = |value: Option<String>| value.or_else(|| (!interactive).then(String::new));
        let dialogs = self.vm.dialogs_mut();
        dialogs.queue_answer(title);
        dialogs.queue_answer(fill(description));
        dialogs.queue_answer(fill(priority));

        let before = self.vm.controller().tasks().len();
        self.vm.invoke(CommandKind::Add);

        let controller = self.vm.controller();
        match controller.tasks().get(before) {
            Some(task) => self.report(
                format!("Added task: {} (#{})", task.title(), task.id()),
                render::task_json(task),
            ),
            None => self.report("Add cancelled".to_string(), json!({ "cancelled": "add" })),
        }
        Ok(())
    }

    fn edit(&mut self, new_title: Option<String>) -> Result<(), AppError> {
        let id = self.require_selection(CommandKind::Edit)?;
        if let Some(title) = new_title {
            if title.trim().is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }
            self.vm.dialogs_mut().queue_answer(Some(title));
        }

        let before = self.title_of(id);
        self.vm.invoke(CommandKind::Edit);

        let controller = self.vm.controller();
        let Some(task) = controller.task(id) else {
            return Err(task_not_found(id));
        };
        if Some(task.title()) == before.as_deref() {
            self.report(
                format!("Task unchanged: {} (#{})", task.title(), task.id()),
                json!({ "unchanged": task.id() }),
            );
        } else {
            self.report(
                format!("Updated task: {} (#{})", task.title(), task.id()),
                render::task_json(task),
            );
        }
        Ok(())
    }

    fn delete(&mut self, yes: bool) -> Result<(), AppError> {
        let id = self.require_selection(CommandKind::Delete)?;
        let Some(task) = self.vm.controller().task(id) else {
            return Err(task_not_found(id));
        };
        let title = task.title().to_string();
        let snapshot = render::task_json(task);

        if yes {
            self.vm.dialogs_mut().queue_confirmation(true);
        }
        self.vm.invoke(CommandKind::Delete);

        if self.vm.controller().task(id).is_none() {
            self.report(format!("Deleted task: {title} (#{id})"), snapshot);
        } else {
            self.report(
                "Delete cancelled".to_string(),
                json!({ "cancelled": "delete" }),
            );
        }
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), AppError> {
        let id = self.require_selection(CommandKind::ToggleStatus)?;
        self.vm.invoke(CommandKind::ToggleStatus);

        let task = self
            .vm
            .controller()
            .task(id)
            .ok_or_else(|| task_not_found(id))?;
        self.report(
            format!("Task #{} is now {}", task.id(), task.status().label()),
            render::task_json(task),
        );
        Ok(())
    }

    fn select(&mut self, id: Option<TaskId>) -> Result<(), AppError> {
        let Some(id) = id else {
            self.vm.select(None);
            self.report("Selection cleared".to_string(), json!({ "selected": null }));
            return Ok(());
        };

        if self.vm.controller().task(id).is_none() {
            return Err(task_not_found(id));
        }
        self.vm.select(Some(id));

        if let Some(task) = self.vm.controller().task(id) {
            self.report(
                format!("Selected task: {} (#{})", task.title(), task.id()),
                json!({ "selected": task.id() }),
            );
        }
        Ok(())
    }

    fn show(&self, id: Option<TaskId>) -> Result<(), AppError> {
        let controller = self.vm.controller();
        let id = id
            .or(controller.selected_id())
            .ok_or_else(|| AppError::invalid_input("no task selected"))?;
        let task = controller.task(id).ok_or_else(|| task_not_found(id))?;

        if self.json {
            println!("{}", render::task_json(task));
        } else {
            println!("{}", render::task_details(task, &self.palette));
        }
        Ok(())
    }

    fn require_selection(&self, kind: CommandKind) -> Result<TaskId, AppError> {
        if !self.vm.can_invoke(kind) {
            return Err(AppError::invalid_input("no task selected"));
        }
        self.vm
            .controller()
            .selected_id()
            .ok_or_else(|| AppError::invalid_input("no task selected"))
    }

    fn title_of(&self, id: TaskId) -> Option<String> {
        self.vm
            .controller()
            .task(id)
            .map(|task| task.title().to_string())
    }

    fn report(&self, message: String, value: Value) {
        if self.json {
            println!("{value}");
        } else {
            println!("{message}");
        }
    }

    fn flush_view(&self) {
        let controller = self.vm.controller();
        if self.view_dirty.replace(false) {
            if self.json {
                println!("{}", render::view_json(controller));
            } else {
                println!("{}", render::task_table(controller));
                println!("{}", render::status_line(controller, &self.palette));
            }
        }

        if self.selection_commands_changed.replace(false) && !self.json {
            let hint = if self.vm.can_invoke(CommandKind::Edit) {
                "edit, delete and toggle now apply to the selected task"
            } else {
                "select a task to edit, delete or toggle it"
            };
            debug!(hint, "selection commands changed");
            println!("{}", self.palette.mutedize(hint));
        }
    }
}

fn task_not_found(id: TaskId) -> AppError {
    AppError::invalid_input(format!("task #{id} not found"))
}

fn print_help() {
    let mut cmd = ShellLine::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("Shell:");
    println!("  help, ?     Show this help");
    println!("  exit, quit  Leave the shell");
}

/// Replaces a leading alias with its configured expansion.
pub fn expand_alias(line: &str, aliases: &HashMap<String, String>) -> String {
    let trimmed = line.trim_start();
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    match aliases.get(head) {
        Some(expansion) if rest.is_empty() => expansion.clone(),
        Some(expansion) => format!("{expansion} {rest}"),
        None => line.to_string(),
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Splits a line into arguments. Double quotes group words; inside quotes a
/// backslash escapes `"` and `\`.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
