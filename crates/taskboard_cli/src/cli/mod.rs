use clap::{Parser, Subcommand, ValueEnum};
use taskboard_core::config::{ConfigOverrides, snake_case};
use taskboard_core::{TaskId, TaskPriority};

/// Interactive in-memory task board.
///
/// Reads one command per line from stdin. Type `help` for the command list.
#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// Start with an empty board instead of the demonstration tasks
    #[arg(long)]
    pub no_sample_data: bool,
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(name = "taskboard", disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Add a new task; prompts for anything not given
    ///
    /// Example: add "Buy milk" -d "2 liters" -p high
    Add {
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<TaskPriority>,
    },
    /// Rename the selected task
    ///
    /// Example: edit "Buy oat milk"
    Edit { new_title: Option<String> },
    /// Delete the selected task after confirmation
    ///
    /// Example: delete --yes
    Delete {
        #[arg(short, long)]
        yes: bool,
    },
    /// Flip the selected task between active and completed
    Toggle,
    /// Select a task by id, or clear the selection when no id is given
    ///
    /// Example: select 2
    Select { id: Option<TaskId> },
    /// Search titles and descriptions; no text clears the search
    ///
    /// Example: search report
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show all, active or completed tasks
    ///
    /// Example: filter completed
    Filter { status: FilterArg },
    /// Print the visible tasks
    List,
    /// Show details of a task (defaults to the selected one)
    ///
    /// Example: show 1
    Show { id: Option<TaskId> },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    SampleData,
    DefaultPriority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = snake_case(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match canonical_field.as_str() {
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            return Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            });
        }
        "theme" => ConfigOverrideTarget::Theme,
        "sample_data" => ConfigOverrideTarget::SampleData,
        "default_priority" | "priority" => ConfigOverrideTarget::DefaultPriority,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if remainder.is_some() {
        return Err(format!("{canonical_field} override cannot have subfields"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Fold parsed overrides into the structure the config layer merges.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::SampleData => {
                let enabled = parse_bool(&parsed.value)
                    .ok_or_else(|| format!("sample_data expects true or false, got '{}'", parsed.value))?;
                overrides.sample_data = Some(enabled);
            }
            ConfigOverrideTarget::DefaultPriority => {
                let priority = parsed
                    .value
                    .parse::<TaskPriority>()
                    .map_err(|err| err.message().to_string())?;
                overrides.default_priority = Some(priority);
            }
        }
    }

    Ok(overrides)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigOverrideTarget, FilterArg, ShellCommand, ShellLine, collect_overrides,
        parse_config_override,
    };
    use clap::Parser;
    use taskboard_core::{TaskId, TaskPriority};

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Midnight ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Midnight");
    }

    #[test]
    fn parse_config_override_rejects_empty_alias_name() {
        let err = parse_config_override("aliases. = foo").unwrap_err();
        assert!(err.contains("aliases override requires an alias name"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("aliasesls").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_rejects_subfields_on_scalars() {
        let err = parse_config_override("sample-data.x=true").unwrap_err();
        assert!(err.contains("cannot have subfields"));
    }

    #[test]
    fn collect_overrides_builds_every_target() {
        let raw = vec![
            "theme=noir".to_string(),
            "aliases. ls = list".to_string(),
            "Sample-Data=off".to_string(),
            "default_priority=high".to_string(),
        ];

        let overrides = collect_overrides(&raw).unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.aliases.get("ls").map(String::as_str), Some("list"));
        assert_eq!(overrides.sample_data, Some(false));
        assert_eq!(overrides.default_priority, Some(TaskPriority::High));
    }

    #[test]
    fn collect_overrides_reports_bad_values() {
        let err = collect_overrides(&["sample_data=maybe".to_string()]).unwrap_err();
        assert!(err.contains("true or false"));

        let err = collect_overrides(&["priority=urgent".to_string()]).unwrap_err();
        assert!(err.contains("unknown priority"));
    }

    #[test]
    fn shell_line_parses_add_with_options() {
        let line =
            ShellLine::try_parse_from(["taskboard", "add", "Buy milk", "-p", "high", "-d", "2l"])
                .unwrap();

        match line.command {
            ShellCommand::Add {
                title,
                description,
                priority,
            } => {
                assert_eq!(title.as_deref(), Some("Buy milk"));
                assert_eq!(description.as_deref(), Some("2l"));
                assert_eq!(priority, Some(TaskPriority::High));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_line_parses_select_and_filter() {
        let line = ShellLine::try_parse_from(["taskboard", "select", "#3"]).unwrap();
        assert!(matches!(line.command, ShellCommand::Select { id: Some(id) } if id == TaskId::new(3)));

        let line = ShellLine::try_parse_from(["taskboard", "filter", "completed"]).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::Filter {
                status: FilterArg::Completed
            }
        ));
    }

    #[test]
    fn shell_line_collects_search_words() {
        let line = ShellLine::try_parse_from(["taskboard", "search", "quarterly", "-report"]).unwrap();

        match line.command {
            ShellCommand::Search { text } => assert_eq!(text, vec!["quarterly", "-report"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_line_rejects_unknown_priority() {
        assert!(ShellLine::try_parse_from(["taskboard", "add", "x", "-p", "urgent"]).is_err());
    }
}
