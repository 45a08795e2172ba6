//! Client library for an HR portal API and a donation-tracking dashboard.
//!
//! DESIGN
//! ======
//! The two halves share nothing. `portal` wraps the portal's same-origin
//! JSON API behind a bearer-token request helper; `donations` talks to a
//! hosted REST table and keeps a per-category tally for a bar chart.
//! Browser globals (local storage, `location.href`, the DOM) are replaced by
//! the `TokenStore`, `Navigator`, and `DashboardView` traits.

pub mod config;
pub mod donations;
pub mod portal;

#[cfg(test)]
mod test_support;
