//! Command-line parsing.
//!
//! Arguments are matched by hand; each command takes a handful of flags.

use widgetdash_core::community::CATEGORY_ALL;
use widgetdash_core::settings::SettingChange;
use widgetdash_core::widget::FieldType;

use crate::error::{AppError, AppResult};

pub const USAGE: &str = "\
Usage: widgetdash <command> [options]

Commands:
  list                              Show every widget with its last data
  refresh                           Fetch every widget now and show the result
  show <id> [--expanded] [--raw]    Show one widget
  add --title T --url U [options]   Create a widget
  edit <id> [options]               Change a widget (its data is fetched again)
  remove <id>                       Delete a widget
  test <url>                        Try an endpoint without saving anything
  community [--category C]          Browse community widgets
  install <title>                   Install a community widget by title
  settings                          Show preferences
  set auto-refresh on|off
  set dark-mode on|off
  set refresh-interval <seconds>
  export                            Print widgets and settings as JSON
  presets                           List color presets
  help                              Show this message

Widget options:
  --title T  --url U  --interval SECONDS
  --background COLOR  --text COLOR  --preset NAME
  --field LABEL=KEY[:text|number|boolean]   (repeatable)
  --remove-field FIELD_ID                   (edit only, repeatable)
";

/// A projected field given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: String,
    pub key: String,
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Parse `LABEL=KEY` or `LABEL=KEY:TYPE`.
    pub fn parse(value: &str) -> AppResult<Self> {
        let (label, rest) = value
            .split_once('=')
            .ok_or_else(|| AppError::Usage(format!("--field expects LABEL=KEY, got {value:?}")))?;
        let (key, field_type) = match rest.rsplit_once(':') {
            Some((key, ty)) => (key, FieldType::parse(ty)),
            None => (rest, FieldType::Text),
        };
        Ok(Self {
            label: label.to_string(),
            key: key.to_string(),
            field_type,
        })
    }
}

/// Form values for `add` and `edit`. Absent flags leave a value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetArgs {
    pub title: Option<String>,
    pub url: Option<String>,
    pub interval: Option<u64>,
    pub background: Option<String>,
    pub text: Option<String>,
    pub preset: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub remove_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Show { id: String, expanded: bool, raw: bool },
    Add(WidgetArgs),
    Edit { id: String, args: WidgetArgs },
    Remove { id: String },
    Test { url: String },
    Community { category: String },
    Install { title: String },
    Settings,
    Set(SettingChange),
    Export,
    Presets,
    Help,
}

impl Command {
    /// Parse arguments following the program name.
    pub fn parse<I, S>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };
        let rest: Vec<String> = args.collect();

        match name.as_str() {
            "list" | "ls" => no_args(&name, &rest).map(|_| Command::List),
            "refresh" => no_args(&name, &rest).map(|_| Command::Refresh),
            "show" => parse_show(&rest),
            "add" => {
                let (positional, args) = parse_widget_args(&rest)?;
                if let Some(extra) = positional.first() {
                    return Err(unexpected(extra));
                }
                if !args.remove_fields.is_empty() {
                    return Err(AppError::Usage("--remove-field only applies to edit".into()));
                }
                Ok(Command::Add(args))
            }
            "edit" => {
                let (positional, args) = parse_widget_args(&rest)?;
                let id = single(&name, "<id>", &positional)?;
                Ok(Command::Edit { id, args })
            }
            "remove" | "rm" => Ok(Command::Remove {
                id: single(&name, "<id>", &rest)?,
            }),
            "test" => Ok(Command::Test {
                url: single(&name, "<url>", &rest)?,
            }),
            "community" => parse_community(&rest),
            "install" => {
                if rest.is_empty() {
                    return Err(AppError::Usage("install requires <title>".into()));
                }
                Ok(Command::Install {
                    title: rest.join(" "),
                })
            }
            "settings" => no_args(&name, &rest).map(|_| Command::Settings),
            "set" => parse_set(&rest),
            "export" => no_args(&name, &rest).map(|_| Command::Export),
            "presets" => no_args(&name, &rest).map(|_| Command::Presets),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(AppError::Usage(format!("Unknown command {other:?}"))),
        }
    }
}

fn unexpected(arg: &str) -> AppError {
    AppError::Usage(format!("Unexpected argument {arg:?}"))
}

fn no_args(command: &str, rest: &[String]) -> AppResult<()> {
    match rest.first() {
        Some(arg) => Err(AppError::Usage(format!(
            "{command} takes no arguments, got {arg:?}"
        ))),
        None => Ok(()),
    }
}

fn single(command: &str, what: &str, rest: &[String]) -> AppResult<String> {
    match rest {
        [one] => Ok(one.clone()),
        [] => Err(AppError::Usage(format!("{command} requires {what}"))),
        [_, extra, ..] => Err(unexpected(extra)),
    }
}

fn flag_value(flag: &str, iter: &mut std::slice::Iter<'_, String>) -> AppResult<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| AppError::Usage(format!("{flag} requires a value")))
}

fn parse_number(flag: &str, value: &str) -> AppResult<u64> {
    value
        .parse()
        .map_err(|_| AppError::Usage(format!("{flag} expects a whole number, got {value:?}")))
}

fn parse_on_off(value: &str) -> AppResult<bool> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(AppError::Usage(format!("Expected on or off, got {other:?}"))),
    }
}

fn parse_show(rest: &[String]) -> AppResult<Command> {
    let mut positional = Vec::new();
    let mut expanded = false;
    let mut raw = false;
    for arg in rest {
        match arg.as_str() {
            "--expanded" => expanded = true,
            "--raw" => raw = true,
            flag if flag.starts_with("--") => return Err(unexpected(flag)),
            _ => positional.push(arg.clone()),
        }
    }
    Ok(Command::Show {
        id: single("show", "<id>", &positional)?,
        expanded,
        raw,
    })
}

fn parse_widget_args(rest: &[String]) -> AppResult<(Vec<String>, WidgetArgs)> {
    let mut positional = Vec::new();
    let mut args = WidgetArgs::default();
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--title" => args.title = Some(flag_value(arg, &mut iter)?),
            "--url" => args.url = Some(flag_value(arg, &mut iter)?),
            "--interval" => {
                let value = flag_value(arg, &mut iter)?;
                args.interval = Some(parse_number(arg, &value)?);
            }
            "--background" => args.background = Some(flag_value(arg, &mut iter)?),
            "--text" => args.text = Some(flag_value(arg, &mut iter)?),
            "--preset" => args.preset = Some(flag_value(arg, &mut iter)?),
            "--field" => args.fields.push(FieldSpec::parse(&flag_value(arg, &mut iter)?)?),
            "--remove-field" => args.remove_fields.push(flag_value(arg, &mut iter)?),
            flag if flag.starts_with("--") => return Err(unexpected(flag)),
            _ => positional.push(arg.clone()),
        }
    }
    Ok((positional, args))
}

fn parse_community(rest: &[String]) -> AppResult<Command> {
    let mut category = CATEGORY_ALL.to_string();
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" => category = flag_value(arg, &mut iter)?,
            other => return Err(unexpected(other)),
        }
    }
    Ok(Command::Community { category })
}

fn parse_set(rest: &[String]) -> AppResult<Command> {
    let [name, value] = rest else {
        return Err(AppError::Usage("set requires <name> <value>".into()));
    };
    let change = match name.as_str() {
        "auto-refresh" => SettingChange::AutoRefresh(parse_on_off(value)?),
        "dark-mode" => SettingChange::DarkMode(parse_on_off(value)?),
        "refresh-interval" => {
            let secs = parse_number(name, value)?;
            if secs == 0 {
                return Err(AppError::Usage("refresh-interval must be at least 1".into()));
            }
            SettingChange::RefreshInterval(secs)
        }
        other => return Err(AppError::Usage(format!("Unknown setting {other:?}"))),
    };
    Ok(Command::Set(change))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(line: &str) -> AppResult<Command> {
        Command::parse(line.split_whitespace())
    }

    #[test]
    fn bare_invocation_is_help() {
        assert_eq!(Command::parse(Vec::<String>::new()).unwrap(), Command::Help);
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("list").unwrap(), Command::List);
        assert_eq!(parse("refresh").unwrap(), Command::Refresh);
        assert_eq!(parse("export").unwrap(), Command::Export);
        assert_eq!(parse("rm w1").unwrap(), Command::Remove { id: "w1".into() });
        assert_matches!(parse("list extra"), Err(AppError::Usage(_)));
        assert_matches!(parse("frobnicate"), Err(AppError::Usage(_)));
    }

    #[test]
    fn show_flags_in_any_order() {
        assert_eq!(
            parse("show --raw w1 --expanded").unwrap(),
            Command::Show {
                id: "w1".into(),
                expanded: true,
                raw: true
            }
        );
        assert_matches!(parse("show"), Err(AppError::Usage(_)));
    }

    #[test]
    fn add_collects_repeated_fields() {
        let cmd = parse(
            "add --title Weather --url https://x.test/w --interval 60 \
             --field Temperature=temp:number --field City=name",
        )
        .unwrap();
        let Command::Add(args) = cmd else {
            panic!("expected add");
        };
        assert_eq!(args.title.as_deref(), Some("Weather"));
        assert_eq!(args.interval, Some(60));
        assert_eq!(
            args.fields,
            vec![
                FieldSpec {
                    label: "Temperature".into(),
                    key: "temp".into(),
                    field_type: FieldType::Number
                },
                FieldSpec {
                    label: "City".into(),
                    key: "name".into(),
                    field_type: FieldType::Text
                },
            ]
        );
    }

    #[test]
    fn widget_flag_errors() {
        assert_matches!(parse("add --title"), Err(AppError::Usage(_)));
        assert_matches!(parse("add --interval soon"), Err(AppError::Usage(_)));
        assert_matches!(parse("add --field nokey"), Err(AppError::Usage(_)));
        assert_matches!(parse("add --remove-field f1"), Err(AppError::Usage(_)));
        assert_matches!(parse("edit --title T"), Err(AppError::Usage(_)));
    }

    #[test]
    fn edit_takes_id_and_flags() {
        let cmd = parse("edit w1 --preset teal --remove-field f1").unwrap();
        assert_matches!(cmd, Command::Edit { id, args }
            if id == "w1" && args.preset.as_deref() == Some("teal") && args.remove_fields == ["f1"]);
    }

    #[test]
    fn install_joins_title_words() {
        assert_eq!(
            parse("install Bitcoin Price").unwrap(),
            Command::Install {
                title: "Bitcoin Price".into()
            }
        );
    }

    #[test]
    fn community_defaults_to_all() {
        assert_eq!(
            parse("community").unwrap(),
            Command::Community {
                category: "All".into()
            }
        );
        assert_eq!(
            parse("community --category Finance").unwrap(),
            Command::Community {
                category: "Finance".into()
            }
        );
    }

    #[test]
    fn set_commands() {
        assert_eq!(
            parse("set dark-mode on").unwrap(),
            Command::Set(SettingChange::DarkMode(true))
        );
        assert_eq!(
            parse("set auto-refresh off").unwrap(),
            Command::Set(SettingChange::AutoRefresh(false))
        );
        assert_eq!(
            parse("set refresh-interval 120").unwrap(),
            Command::Set(SettingChange::RefreshInterval(120))
        );
        assert_matches!(parse("set refresh-interval 0"), Err(AppError::Usage(_)));
        assert_matches!(parse("set dark-mode maybe"), Err(AppError::Usage(_)));
        assert_matches!(parse("set volume 11"), Err(AppError::Usage(_)));
    }
}
