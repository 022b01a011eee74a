//! Interactive session: add, edit, update, delete and back, like the form-based workflow.

use crate::adapters::presenter::TextPresenter;
use crate::core::tracker::Tracker;
use crate::domain::model::EntryId;
use crate::domain::ports::{KeyValueStore, Presenter};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

pub const HELP: &str = "\
Commands:
  list                      show items and total
  add <calories> <name>     add an item
  edit <id>                 select an item for editing
  update <calories> <name>  save changes to the selected item
  delete [id]               delete the selected item, or the given id
  back                      leave edit mode without changes
  clear                     delete every item
  total                     show total calories
  help                      show this message
  quit                      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    Add { calories: String, name: String },
    Edit(EntryId),
    Update { calories: String, name: String },
    Delete(Option<EntryId>),
    Back,
    Clear,
    Total,
    Help,
    Quit,
}

/// 解析一行輸入；錯誤時回傳用法說明
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(ShellCommand::Empty);
    };

    match command {
        "list" | "ls" => Ok(ShellCommand::List),
        "add" => {
            let (calories, name) = calories_and_name(parts, "add")?;
            Ok(ShellCommand::Add { calories, name })
        }
        "edit" => parse_id(parts.next(), "edit <id>").map(ShellCommand::Edit),
        "update" => {
            let (calories, name) = calories_and_name(parts, "update")?;
            Ok(ShellCommand::Update { calories, name })
        }
        "delete" | "rm" => match parts.next() {
            None => Ok(ShellCommand::Delete(None)),
            Some(raw) => parse_id(Some(raw), "delete [id]").map(|id| ShellCommand::Delete(Some(id))),
        },
        "back" => Ok(ShellCommand::Back),
        "clear" => Ok(ShellCommand::Clear),
        "total" => Ok(ShellCommand::Total),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command '{}', type 'help'", other)),
    }
}

fn calories_and_name<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    command: &str,
) -> std::result::Result<(String, String), String> {
    let usage = || format!("Usage: {} <calories> <name>", command);

    let calories = parts.next().ok_or_else(usage)?.to_string();
    let name = parts.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(usage());
    }
    Ok((calories, name))
}

fn parse_id(raw: Option<&str>, usage: &str) -> std::result::Result<EntryId, String> {
    raw.and_then(|r| r.parse().ok())
        .ok_or_else(|| format!("Usage: {}", usage))
}

pub fn execute<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    command: ShellCommand,
    presenter: &mut impl Presenter,
) -> Result<()> {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::List => tracker.refresh(presenter),
        ShellCommand::Add { calories, name } => {
            tracker.add(&name, &calories, presenter)?;
        }
        ShellCommand::Edit(id) => {
            tracker.select(id, presenter)?;
        }
        ShellCommand::Update { calories, name } => {
            tracker.update(&name, &calories, presenter)?;
        }
        ShellCommand::Delete(None) => {
            tracker.delete_current(presenter)?;
        }
        ShellCommand::Delete(Some(id)) => {
            tracker.delete(id, presenter)?;
        }
        ShellCommand::Back => tracker.cancel_edit(presenter),
        ShellCommand::Clear => tracker.clear_all(presenter)?,
        ShellCommand::Total => {
            presenter.notify(&format!("Total Calories: {}", tracker.total_calories()))
        }
        ShellCommand::Help => presenter.notify(HELP),
    }
    Ok(())
}

/// 讀取指令直到 quit 或輸入結束；單一動作失敗只回報，不結束 session
pub fn run_shell<S, R, W>(tracker: &mut Tracker<S>, input: R, out: W) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    let mut presenter = TextPresenter::new(out);
    presenter.notify("Calorie tracker - type 'help' for commands");
    tracker.refresh(&mut presenter);

    for line in input.lines() {
        let line = line?;

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(usage) => {
                presenter.notify(&usage);
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        if let Err(e) = execute(tracker, command, &mut presenter) {
            if e.is_recoverable() {
                tracing::debug!("Rejected shell command '{}': {}", line.trim(), e);
            } else {
                tracing::error!("❌ '{}' failed: {}", line.trim(), e);
            }
            presenter.notify(&format!("❌ {}", e.user_friendly_message()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_multi_word_name() {
        assert_eq!(
            parse_line("add 1200 Steak Dinner").unwrap(),
            ShellCommand::Add {
                calories: "1200".to_string(),
                name: "Steak Dinner".to_string()
            }
        );
    }

    #[test]
    fn test_parse_requires_name_and_calories() {
        assert!(parse_line("add").is_err());
        assert!(parse_line("add 300").is_err());
        assert!(parse_line("update 300").is_err());
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_line("edit 3").unwrap(), ShellCommand::Edit(EntryId(3)));
        assert_eq!(parse_line("delete").unwrap(), ShellCommand::Delete(None));
        assert_eq!(
            parse_line("rm 2").unwrap(),
            ShellCommand::Delete(Some(EntryId(2)))
        );
        assert!(parse_line("edit x").is_err());
        assert!(parse_line("edit").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   ").unwrap(), ShellCommand::Empty);
        assert_eq!(parse_line("quit").unwrap(), ShellCommand::Quit);
        assert!(parse_line("dance").is_err());
    }
}
