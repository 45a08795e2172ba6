//! Donations — dashboard over a hosted REST table of donation rows.
//!
//! DESIGN
//! ======
//! [`client::RestClient`] talks to the backend; [`dashboard::Dashboard`]
//! drives the table refresh, the per-category [`tally::Tally`], and form
//! submission against any [`client::DonationBackend`] and
//! [`view::DashboardView`].

pub mod client;
pub mod dashboard;
pub mod tally;
pub mod types;
pub mod view;

pub use client::{DonationBackend, RestClient};
pub use dashboard::{Dashboard, RefreshReport};
pub use tally::Tally;
pub use types::{Donation, DonationError, DonationForm, DonationKind, NewDonation, TallyRow};
pub use view::{DashboardView, Notice, TerminalView};
