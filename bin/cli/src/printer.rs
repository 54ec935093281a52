//! Terminal output: messages, bordered tables, JSON and check markers.

use crate::error::CliError;
use authctl_authz::Decision;
use authctl_core::ListMetadata;
use colored::{ColoredString, Colorize};
use rootcause::prelude::Report;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fmt::Display;
use std::io::Write;

#[cfg(windows)]
const CHECKMARK: &str = "√";
#[cfg(not(windows))]
const CHECKMARK: &str = "✔";

#[cfg(windows)]
const CROSS: &str = "×";
#[cfg(not(windows))]
const CROSS: &str = "✖";

const QUESTION_MARK: &str = "?";

/// Green check mark followed by `label`.
#[must_use]
pub fn pass(label: &str) -> ColoredString {
    format!("{CHECKMARK} {label}").trim_end().green()
}

/// Red cross followed by `label`.
#[must_use]
pub fn fail(label: &str) -> ColoredString {
    format!("{CROSS} {label}").trim_end().red()
}

/// Coloured marker for a decision tree node.
#[must_use]
pub fn decision_marker(decision: Decision) -> String {
    match decision {
        Decision::Matched => CHECKMARK.green().to_string(),
        Decision::NotMatched => CROSS.red().to_string(),
        Decision::EvalPolicy => QUESTION_MARK.yellow().to_string(),
        Decision::Unknown => decision.symbol().to_string(),
    }
}

/// Plain marker for a boolean table cell.
#[must_use]
pub fn yes_no(value: bool) -> &'static str {
    if value { CHECKMARK } else { CROSS }
}

/// A plain bordered grid with a highlighted header row.
///
/// Cells may span several lines.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given column headers.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells render empty; extra cells are dropped.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Renders the table.
    #[must_use]
    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|column| {
                std::iter::once(&self.headers[column])
                    .chain(self.rows.iter().map(|row| &row[column]))
                    .flat_map(|cell| cell.lines())
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = |left: &str, middle: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", segments.join(middle))
        };

        let mut lines = vec![border("┌", "┬", "┐")];
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:<w$}").yellow().to_string())
            .collect();
        lines.push(format!("│ {} │", header.join(" │ ")));
        lines.push(border("├", "┼", "┤"));

        for row in &self.rows {
            let cells: Vec<Vec<&str>> = row.iter().map(|cell| cell.lines().collect()).collect();
            let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for index in 0..height {
                let parts: Vec<String> = cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &w)| format!("{:<w$}", cell.get(index).copied().unwrap_or("")))
                    .collect();
                lines.push(format!("│ {} │", parts.join(" │ ")));
            }
        }

        lines.push(border("└", "┴", "┘"));
        lines.join("\n")
    }
}

/// Writes command output.
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
}

impl<W: Write> Printer<W> {
    /// Creates a printer over `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes one line.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when the write fails.
    pub fn line(&mut self, message: impl Display) -> Result<(), Report<CliError>> {
        writeln!(self.out, "{message}").map_err(|e| {
            CliError::Output {
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Writes a value as 4-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when the value cannot be encoded or written.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Report<CliError>> {
        self.line(to_pretty_json(value)?)
    }

    /// Writes a table.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when the write fails.
    pub fn table(&mut self, table: &Table) -> Result<(), Report<CliError>> {
        self.line(table.render())
    }

    /// Writes the cursors of a list response.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Output`] when the write fails.
    pub fn cursors(&mut self, metadata: &ListMetadata) -> Result<(), Report<CliError>> {
        self.line(format_args!(
            "Before: {}",
            metadata.before.as_deref().unwrap_or_default()
        ))?;
        self.line(format_args!(
            "After: {}",
            metadata.after.as_deref().unwrap_or_default()
        ))
    }
}

/// Encodes a value as 4-space indented JSON.
///
/// # Errors
///
/// Returns [`CliError::Output`] when the value cannot be encoded.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Report<CliError>> {
    let output = |details: String| CliError::Output { details };

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| output(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| output(e.to_string()).into())
}
