//! Domain Entities
//!
//! Core business entities for the plots domain.

use chrono::{DateTime, Utc};
use kernel::id::PlotId;

use crate::domain::value_objects::PlotStatus;

/// A sellable land unit
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub id: PlotId,
    /// Unique across all records
    pub plot_number: String,
    pub location: String,
    /// Free-text size descriptor, e.g. "1000 sq ft"
    pub size: String,
    /// Strictly positive, two decimal places in the store
    pub price: f64,
    pub status: PlotStatus,
    /// Empty when none was given
    pub description: String,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlot {
    pub plot_number: String,
    pub location: String,
    pub size: String,
    pub price: f64,
    pub status: PlotStatus,
    pub description: String,
    pub amenities: Vec<String>,
}

/// Sparse field set for a partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotChanges {
    pub plot_number: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub status: Option<PlotStatus>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
}

impl PlotChanges {
    pub fn is_empty(&self) -> bool {
        self.plot_number.is_none()
            && self.location.is_none()
            && self.size.is_none()
            && self.price.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.amenities.is_none()
    }
}
