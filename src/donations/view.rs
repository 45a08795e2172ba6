//! Rendering targets for the donation dashboard.

use std::fmt::Write as _;
use std::io::Write;

use tracing::warn;

use super::types::Donation;

pub const TABLE_HEADERS: [&str; 5] = ["Nome", "Contato", "Tipo", "Quantidade", "Data"];
pub const CHART_TITLE: &str = "Total por Tipo de Doação";
const BAR_WIDTH: usize = 40;

/// A user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Where the dashboard draws its table, chart, and notices.
pub trait DashboardView: Send {
    /// Remove every row from the table.
    fn clear_table(&mut self);

    /// Append one row to the table.
    fn push_row(&mut self, donation: &Donation);

    /// Called after the last row of a refresh has been pushed.
    fn table_complete(&mut self) {}

    /// Replace the chart dataset and redraw.
    fn update_chart(&mut self, labels: &[&'static str; 3], totals: &[i64; 3]);

    fn notify(&mut self, notice: Notice);
}

// =============================================================================
// TERMINAL
// =============================================================================

/// Writes the table, chart, and notices as plain text.
///
/// Rows are buffered until the table is complete so columns can be aligned.
pub struct TerminalView<W: Write + Send> {
    out: W,
    rows: Vec<Donation>,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, rows: Vec::new() }
    }

    /// Rows currently in the table.
    pub fn rows(&self) -> &[Donation] {
        &self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!(error = %e, "dashboard output failed");
        }
    }
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn clear_table(&mut self) {
        self.rows.clear();
    }

    fn push_row(&mut self, donation: &Donation) {
        self.rows.push(donation.clone());
    }

    fn table_complete(&mut self) {
        let text = format_table(&self.rows);
        self.emit(&text);
    }

    fn update_chart(&mut self, labels: &[&'static str; 3], totals: &[i64; 3]) {
        let text = format_chart(labels, totals);
        self.emit(&text);
    }

    fn notify(&mut self, notice: Notice) {
        let line = match notice {
            Notice::Success(msg) => format!("[ok] {msg}\n"),
            Notice::Error(msg) => format!("[erro] {msg}\n"),
        };
        self.emit(&line);
    }
}

/// Render donations as left-aligned columns under [`TABLE_HEADERS`].
#[must_use]
pub fn format_table(rows: &[Donation]) -> String {
    let cells: Vec<[String; 5]> = rows.iter().map(Donation::cells).collect();
    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &TABLE_HEADERS.map(str::to_owned), &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// Render totals as horizontal bars scaled to the largest total.
///
/// Bars start at zero; negative totals draw no bar.
#[must_use]
pub fn format_chart(labels: &[&'static str; 3], totals: &[i64; 3]) -> String {
    let max = totals.iter().copied().max().unwrap_or(0).max(0);
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = format!("{CHART_TITLE}\n");
    for (label, &total) in labels.iter().zip(totals) {
        let bar = "█".repeat(bar_len(total, max));
        let _ = writeln!(out, "{label:<label_width$} | {bar} {total}");
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar_len(total: i64, max: i64) -> usize {
    if total <= 0 || max <= 0 {
        return 0;
    }
    let scaled = (total as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    scaled.max(1)
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
