//! Donation dashboard — table refresh, tally refresh, and form submission.
//!
//! DESIGN
//! ======
//! `Dashboard` owns its backend, its view, and the current tally, so no
//! state is global. Both refreshes empty their view before fetching, so a
//! failed refresh leaves an empty table or a zero tally rather than stale
//! data. After a successful submission the table and the tally
//! are refreshed one after the other; both are always attempted and each
//! failure is reported to the user separately.

use tracing::{error, info};

use super::client::DonationBackend;
use super::tally::Tally;
use super::types::{DonationError, DonationForm};
use super::view::{DashboardView, Notice};

pub const SUBMIT_SUCCESS: &str = "Doação cadastrada com sucesso!";
pub const SUBMIT_FAILURE: &str = "Erro ao cadastrar doação. Verifique o console.";
pub const TABLE_REFRESH_FAILURE: &str = "Falha ao atualizar a tabela de doações";
pub const TALLY_REFRESH_FAILURE: &str = "Falha ao atualizar o gráfico de doações";

/// Result of refreshing both views.
#[derive(Debug)]
pub struct RefreshReport {
    /// Number of rows drawn, or why the table refresh failed.
    pub table: Result<usize, DonationError>,
    /// Totals drawn, or why the tally refresh failed.
    pub tally: Result<Tally, DonationError>,
}

impl RefreshReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.table.is_ok() && self.tally.is_ok()
    }

    /// First failure, table before tally.
    ///
    /// # Errors
    ///
    /// Returns whichever refresh failed first.
    pub fn into_result(self) -> Result<(), DonationError> {
        self.table?;
        self.tally?;
        Ok(())
    }
}

pub struct Dashboard<B, V> {
    backend: B,
    view: V,
    tally: Tally,
}

impl<B: DonationBackend, V: DashboardView> Dashboard<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        Self { backend, view, tally: Tally::default() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Totals from the most recent tally refresh.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Reload every donation row into the table.
    ///
    /// The table is cleared before the fetch.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the table is left empty.
    pub async fn refresh_table(&mut self) -> Result<usize, DonationError> {
        self.view.clear_table();
        let rows = self.backend.list_donations().await?;
        for row in &rows {
            self.view.push_row(row);
        }
        self.view.table_complete();
        Ok(rows.len())
    }

    /// Recompute the per-category tally and redraw the chart.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the tally is left at zero and the chart is
    /// not redrawn.
    pub async fn refresh_tally(&mut self) -> Result<Tally, DonationError> {
        self.tally.reset();
        let rows = self.backend.list_tally_rows().await?;
        self.tally = Tally::from_rows(&rows);
        self.view.update_chart(&Tally::labels(), &self.tally.totals());
        Ok(self.tally)
    }

    /// Initial page load: fill the table and the chart.
    pub async fn load(&mut self) -> RefreshReport {
        self.refresh_all().await
    }

    /// Submit the form as a new donation.
    ///
    /// On success the form is reset and both views are refreshed once each.
    /// On failure the form keeps its values and nothing is refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`DonationError::InvalidQuantity`] before any request when the
    /// quantity has no integer value, or the backend error from the create
    /// call.
    pub async fn submit(&mut self, form: &mut DonationForm) -> Result<RefreshReport, DonationError> {
        let donation = match form.to_new_donation() {
            Ok(donation) => donation,
            Err(e) => {
                self.view.notify(Notice::Error(SUBMIT_FAILURE.to_owned()));
                return Err(e);
            }
        };

        if let Err(e) = self.backend.create_donation(&donation).await {
            match &e {
                DonationError::Api { status, body } => error!(status, body = %body, "donation create rejected"),
                other => error!(error = %other, "donation create failed"),
            }
            self.view.notify(Notice::Error(SUBMIT_FAILURE.to_owned()));
            return Err(e);
        }

        info!(kind = %donation.kind, quantity = donation.quantity, "donation submitted");
        self.view.notify(Notice::Success(SUBMIT_SUCCESS.to_owned()));
        form.reset();
        Ok(self.refresh_all().await)
    }

    async fn refresh_all(&mut self) -> RefreshReport {
        let table = self.refresh_table().await;
        if let Err(e) = &table {
            error!(error = %e, "table refresh failed");
            self.view.notify(Notice::Error(format!("{TABLE_REFRESH_FAILURE}: {e}")));
        }

        let tally = self.refresh_tally().await;
        if let Err(e) = &tally {
            error!(error = %e, "tally refresh failed");
            self.view.notify(Notice::Error(format!("{TALLY_REFRESH_FAILURE}: {e}")));
        }

        RefreshReport { table, tally }
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
