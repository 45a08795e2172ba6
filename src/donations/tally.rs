//! Per-category donation totals for the bar chart.

use tracing::{debug, warn};

use super::types::{DonationKind, Quantity, TallyRow};

/// Running quantity sums for the three known categories.
///
/// Always holds exactly one total per [`DonationKind`]; rows with any other
/// category never reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    totals: [i64; 3],
}

impl Tally {
    /// Sum quantities per known category, starting from zero.
    ///
    /// Rows with an unknown or missing category are dropped silently; rows
    /// whose quantity has no integer value add nothing.
    #[must_use]
    pub fn from_rows(rows: &[TallyRow]) -> Self {
        let mut tally = Self::default();
        for row in rows {
            let Some(kind) = row.kind.as_deref().and_then(DonationKind::from_label) else {
                debug!(category = ?row.kind, "skipping unknown donation category");
                continue;
            };
            match row.quantity.as_ref().and_then(Quantity::as_int) {
                Some(quantity) => tally.add(kind, quantity),
                None => warn!(category = %kind, quantity = ?row.quantity, "quantity is not an integer"),
            }
        }
        tally
    }

    pub fn add(&mut self, kind: DonationKind, quantity: i64) {
        let slot = &mut self.totals[kind.index()];
        *slot = slot.saturating_add(quantity);
    }

    #[must_use]
    pub fn get(&self, kind: DonationKind) -> i64 {
        self.totals[kind.index()]
    }

    pub fn reset(&mut self) {
        self.totals = [0; 3];
    }

    /// Totals in fixed label order: Alimento, Roupa, Higiene.
    #[must_use]
    pub fn totals(&self) -> [i64; 3] {
        self.totals
    }

    #[must_use]
    pub fn labels() -> [&'static str; 3] {
        DonationKind::ALL.map(DonationKind::label)
    }
}

#[cfg(test)]
#[path = "tally_test.rs"]
mod tests;
