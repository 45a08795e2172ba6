//! Donation types — records, form values, categories, and errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by donation backend calls and form handling.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// A list response could not be deserialized.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The form quantity has no leading integer.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// A category label outside the known set.
    #[error("unknown donation type: {0:?}")]
    UnknownKind(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CATEGORY
// =============================================================================

/// The fixed set of donation categories, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DonationKind {
    Alimento,
    Roupa,
    Higiene,
}

impl DonationKind {
    pub const ALL: [Self; 3] = [Self::Alimento, Self::Roupa, Self::Higiene];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Alimento => "Alimento",
            Self::Roupa => "Roupa",
            Self::Higiene => "Higiene",
        }
    }

    /// Exact, case-sensitive match against the stored labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DonationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DonationKind {
    type Err = DonationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| DonationError::UnknownKind(s.to_owned()))
    }
}

// =============================================================================
// QUANTITY
// =============================================================================

/// A quantity as stored by the backend: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Quantity {
    /// Integer value with leading-integer semantics: text is trimmed and its
    /// leading sign and digits are taken; floats are truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.abs() < 9.0e18 => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => parse_int_prefix(s),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Parse the leading integer of `raw`, ignoring leading whitespace and any
/// trailing non-digit text. `"12abc"` is 12; `"abc"` and `""` are `None`.
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// RECORDS
// =============================================================================

/// A donation row as returned by `select=*`. Extra columns are ignored and
/// null columns read as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Donation {
    #[serde(rename = "nome", default)]
    pub donor_name: Option<String>,
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
    #[serde(rename = "tipo_doacao", default)]
    pub kind: Option<String>,
    #[serde(rename = "quantidade", default)]
    pub quantity: Option<Quantity>,
    #[serde(rename = "data_doacao", default)]
    pub date: Option<String>,
}

impl Donation {
    /// Table cells in column order: name, contact, type, quantity, date.
    #[must_use]
    pub fn cells(&self) -> [String; 5] {
        [
            self.donor_name.clone().unwrap_or_default(),
            self.contact.clone().unwrap_or_default(),
            self.kind.clone().unwrap_or_default(),
            self.quantity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            self.date.clone().unwrap_or_default(),
        ]
    }
}

/// A category/quantity pair from `select=tipo_doacao,quantidade`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TallyRow {
    #[serde(rename = "tipo_doacao", default)]
    pub kind: Option<String>,
    #[serde(rename = "quantidade", default)]
    pub quantity: Option<Quantity>,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDonation {
    #[serde(rename = "nome")]
    pub donor_name: String,
    #[serde(rename = "contato")]
    pub contact: String,
    #[serde(rename = "tipo_doacao")]
    pub kind: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    #[serde(rename = "data_doacao")]
    pub date: String,
}

// =============================================================================
// FORM
// =============================================================================

/// Raw field values of the donation form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DonationForm {
    pub donor_name: String,
    pub contact: String,
    pub kind: String,
    pub quantity: String,
    pub date: String,
}

impl DonationForm {
    /// Build the create body; quantity uses leading-integer parsing.
    ///
    /// # Errors
    ///
    /// Returns [`DonationError::InvalidQuantity`] when the quantity field has
    /// no leading integer.
    pub fn to_new_donation(&self) -> Result<NewDonation, DonationError> {
        let quantity =
            parse_int_prefix(&self.quantity).ok_or_else(|| DonationError::InvalidQuantity(self.quantity.clone()))?;
        Ok(NewDonation {
            donor_name: self.donor_name.clone(),
            contact: self.contact.clone(),
            kind: self.kind.clone(),
            quantity,
            date: self.date.clone(),
        })
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
