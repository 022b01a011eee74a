use crate::domain::model::{Entry, View};
use crate::domain::ports::Presenter;
use crate::utils::error::Result;
use std::io::Write;

/// 以純文字輸出清單、總熱量與編輯狀態
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: View<'_>) -> std::io::Result<()> {
        if view.entries.is_empty() {
            writeln!(self.out, "(no items)")?;
        } else {
            for entry in view.entries {
                let marker = match view.current {
                    Some(current) if current.id == entry.id => '*',
                    _ => ' ',
                };
                writeln!(
                    self.out,
                    "{} [{}] {}: {} Calories",
                    marker, entry.id, entry.name, entry.value
                )?;
            }
        }

        writeln!(self.out, "Total Calories: {}", view.total_calories)?;

        if let Some(current) = view.current {
            writeln!(
                self.out,
                "Editing [{}] {} ({} Calories) - update, delete or back",
                current.id, current.name, current.value
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, view: View<'_>) {
        if let Err(e) = self.write_view(view) {
            tracing::warn!("Failed to render item list: {}", e);
        }
    }

    fn notify(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            tracing::warn!("Failed to write message: {}", e);
        }
    }
}

/// 不輸出任何東西，用於不需要畫面的呼叫端
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn render(&mut self, _view: View<'_>) {}

    fn notify(&mut self, _message: &str) {}
}

/// 匯出為 CSV（id,name,calories）
pub fn write_csv<W: Write>(entries: &[Entry], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["id", "name", "calories"])?;

    for entry in entries {
        writer.write_record([
            entry.id.to_string(),
            entry.name.clone(),
            entry.value.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EntryId;

    fn render(view: View<'_>) -> String {
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.render(view);
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_render_empty() {
        let output = render(View {
            entries: &[],
            total_calories: 0,
            current: None,
        });
        assert_eq!(output, "(no items)\nTotal Calories: 0\n");
    }

    #[test]
    fn test_render_edit_state() {
        let entries = vec![
            Entry::new(EntryId(0), "Steak", 1200),
            Entry::new(EntryId(1), "Cookie", 400),
        ];
        let output = render(View {
            entries: &entries,
            total_calories: 1600,
            current: Some(&entries[1]),
        });

        assert!(output.contains("  [0] Steak: 1200 Calories\n"));
        assert!(output.contains("* [1] Cookie: 400 Calories\n"));
        assert!(output.contains("Total Calories: 1600\n"));
        assert!(output.contains("Editing [1] Cookie"));
    }

    #[test]
    fn test_write_csv_quotes_names() {
        let entries = vec![
            Entry::new(EntryId(0), "Steak, medium", 1200),
            Entry::new(EntryId(3), "Cookie", 400),
        ];
        let mut buf = Vec::new();
        write_csv(&entries, &mut buf).unwrap();

        let csv_content = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv_content,
            "id,name,calories\n0,\"Steak, medium\",1200\n3,Cookie,400\n"
        );
    }
}
