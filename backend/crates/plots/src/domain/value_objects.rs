//! Domain Value Objects
//!
//! Immutable value types for the plots domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sale status of a plot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl PlotStatus {
    pub const ALL: [PlotStatus; 3] = [PlotStatus::Available, PlotStatus::Reserved, PlotStatus::Sold];

    /// Value stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotStatus::Available => "available",
            PlotStatus::Reserved => "reserved",
            PlotStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plot status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PlotStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Filter for the public plot listing
///
/// Status is always applied; an unset status in the request means
/// [`PlotStatus::Available`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotFilter {
    pub status: PlotStatus,
    /// Case-insensitive substring of `location`
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
