use crate::adapters::presenter::{write_csv, SilentPresenter, TextPresenter};
use crate::app::shell::run_shell;
use crate::config::cli::Command;
use crate::core::tracker::Tracker;
use crate::domain::model::EntryId;
use crate::domain::ports::{KeyValueStore, Presenter};
use crate::utils::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};

/// 執行單次指令，結果輸出到 `out`
pub fn run_command<S: KeyValueStore, W: Write>(
    tracker: &mut Tracker<S>,
    command: Command,
    mut out: W,
) -> Result<()> {
    match command {
        Command::List => {
            tracker.refresh(&mut TextPresenter::new(&mut out));
        }
        Command::Add { name, calories } => {
            let mut presenter = TextPresenter::new(&mut out);
            let entry = tracker.add(&name, &calories, &mut presenter)?;
            presenter.notify(&format!("✅ Added [{}] {}", entry.id, entry.name));
        }
        Command::Update { id, name, calories } => {
            tracker.select(EntryId(id), &mut SilentPresenter)?;
            let mut presenter = TextPresenter::new(&mut out);
            let entry = tracker.update(&name, &calories, &mut presenter)?;
            presenter.notify(&format!("✅ Updated [{}] {}", entry.id, entry.name));
        }
        Command::Delete { id } => {
            let mut presenter = TextPresenter::new(&mut out);
            let entry = tracker.delete(EntryId(id), &mut presenter)?;
            presenter.notify(&format!("🗑️ Deleted [{}] {}", entry.id, entry.name));
        }
        Command::Clear => {
            let mut presenter = TextPresenter::new(&mut out);
            tracker.clear_all(&mut presenter)?;
            presenter.notify("🗑️ All items cleared");
        }
        Command::Total => {
            writeln!(out, "{}", tracker.total_calories())?;
        }
        Command::Export { output: Some(path) } => {
            let file = BufWriter::new(File::create(&path)?);
            write_csv(tracker.entries(), file)?;
            tracing::info!("📁 Exported {} items to {}", tracker.entries().len(), path.display());
        }
        Command::Export { output: None } => {
            write_csv(tracker.entries(), &mut out)?;
        }
        Command::Shell => {
            let stdin = std::io::stdin();
            run_shell(tracker, stdin.lock(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
