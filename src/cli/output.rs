//! Terminal rendering: JSON or aligned tables, plus the notifier that shows
//! notices to the person at the keyboard.

use crate::app_lib::{Notice, NoticeLevel, Notifier};
use anyhow::Result;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Copy, Debug, Default)]
pub struct Output {
    json: bool,
}

impl Output {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    #[must_use]
    pub fn is_json(self) -> bool {
        self.json
    }

    /// Prints `value` as JSON, or the text built by `human`.
    ///
    /// # Errors
    /// Returns an error if `value` cannot be serialized.
    pub fn emit<T, F>(self, value: &T, human: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = human();
            if !text.is_empty() {
                println!("{text}");
            }
        }
        Ok(())
    }
}

/// Column-aligned plain-text table.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(index) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }

        let header: Vec<String> = self.headers.iter().map(ToString::to_string).collect();
        std::iter::once(&header)
            .chain(self.rows.iter())
            .map(|cells| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(index, cell)| {
                        let pad = widths[index].saturating_sub(cell.chars().count());
                        format!("{cell}{}", " ".repeat(pad))
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `key: value` lines with aligned values; empty values are skipped.
#[must_use]
pub fn fields(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders optional values as empty strings.
#[must_use]
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[must_use]
pub fn yes_no(value: bool) -> String {
    (if value { "yes" } else { "no" }).to_string()
}

/// Prints success and info notices; warnings and errors go to the log, since
/// the failing command reports its own error.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier {
    json: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            // keep stdout parseable in JSON mode
            NoticeLevel::Success | NoticeLevel::Info if self.json => eprintln!("{notice}"),
            NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
            NoticeLevel::Warning | NoticeLevel::Error => warn!(notice = %notice.message),
        }
    }
}
