//! API DTOs (Data Transfer Objects)
//!
//! Request bodies use camelCase keys and reject unknown keys. Responses use
//! the snake_case column names.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::domain::entities::{NewPlot, Plot, PlotChanges};
use crate::domain::value_objects::{PlotFilter, PlotStatus};

const PLOT_NUMBER_LEN: (usize, usize) = (3, 20);
const LOCATION_LEN: (usize, usize) = (3, 200);
const DESCRIPTION_MAX: usize = 1000;

// ============================================================================
// Field validation
// ============================================================================

/// Collects one message per field problem
#[derive(Debug, Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.0.push(format!("\"{field}\" is required"));
        }
        value
    }

    fn text(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len == 0 && min > 0 {
            self.0.push(format!("\"{field}\" is not allowed to be empty"));
        } else if len < min {
            self.0.push(format!(
                "\"{field}\" length must be at least {min} characters long"
            ));
        } else if len > max {
            self.0.push(format!(
                "\"{field}\" length must be less than or equal to {max} characters long"
            ));
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.0.push(format!("\"{field}\" must be a positive number"));
        }
    }

    fn status(&mut self, field: &str, value: &str) -> Option<PlotStatus> {
        match PlotStatus::from_str(value) {
            Ok(status) => Some(status),
            Err(_) => {
                self.0.push(format!(
                    "\"{field}\" must be one of [available, reserved, sold]"
                ));
                None
            }
        }
    }

    fn number(&mut self, field: &str, value: &str) -> Option<f64> {
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                self.0.push(format!("\"{field}\" must be a number"));
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<String>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

// ============================================================================
// Create / Update
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// `55000` and `"55000"` both read as a number
fn number_or_numeric_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom("\"price\" must be a number")),
    }
}

/// Request for POST /api/plots
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePlotRequest {
    #[serde(default)]
    pub plot_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "number_or_numeric_text")]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl CreatePlotRequest {
    pub fn validate(self) -> Result<NewPlot, Vec<String>> {
        let mut errors = FieldErrors::default();

        let plot_number = errors.required("plotNumber", self.plot_number);
        if let Some(v) = &plot_number {
            errors.text("plotNumber", v, PLOT_NUMBER_LEN.0, PLOT_NUMBER_LEN.1);
        }
        let location = errors.required("location", self.location);
        if let Some(v) = &location {
            errors.text("location", v, LOCATION_LEN.0, LOCATION_LEN.1);
        }
        let size = errors.required("size", self.size);
        if let Some(v) = &size {
            errors.text("size", v, 1, usize::MAX);
        }
        let price = errors.required("price", self.price);
        if let Some(v) = price {
            errors.positive("price", v);
        }
        let status = match &self.status {
            Some(v) => errors.status("status", v),
            None => Some(PlotStatus::default()),
        };
        if let Some(v) = &self.description {
            errors.text("description", v, 0, DESCRIPTION_MAX);
        }

        match (plot_number, location, size, price, status) {
            (Some(plot_number), Some(location), Some(size), Some(price), Some(status)) => errors
                .finish(NewPlot {
                    plot_number,
                    location,
                    size,
                    price,
                    status,
                    description: self.description.unwrap_or_default(),
                    amenities: self.amenities.unwrap_or_default(),
                }),
            _ => Err(errors.0),
        }
    }
}

/// Request for PUT /api/plots/{id}; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePlotRequest {
    #[serde(default)]
    pub plot_number: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "number_or_numeric_text")]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl UpdatePlotRequest {
    /// Emptiness is not checked here; the use case reports it separately.
    pub fn validate(self) -> Result<PlotChanges, Vec<String>> {
        let mut errors = FieldErrors::default();

        if let Some(v) = &self.plot_number {
            errors.text("plotNumber", v, PLOT_NUMBER_LEN.0, PLOT_NUMBER_LEN.1);
        }
        if let Some(v) = &self.location {
            errors.text("location", v, LOCATION_LEN.0, LOCATION_LEN.1);
        }
        if let Some(v) = &self.size {
            errors.text("size", v, 1, usize::MAX);
        }
        if let Some(v) = self.price {
            errors.positive("price", v);
        }
        let status = self.status.as_deref().and_then(|v| errors.status("status", v));
        if let Some(v) = &self.description {
            errors.text("description", v, 0, DESCRIPTION_MAX);
        }

        errors.finish(PlotChanges {
            plot_number: self.plot_number,
            location: self.location,
            size: self.size,
            price: self.price,
            status,
            description: self.description,
            amenities: self.amenities,
        })
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Query for GET /api/plots
///
/// Values arrive as text; empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlotsQuery {
    pub status: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListPlotsQuery {
    pub fn into_filter(self) -> Result<PlotFilter, Vec<String>> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        let mut errors = FieldErrors::default();

        let status = present(self.status)
            .and_then(|s| errors.status("status", &s))
            .unwrap_or_default();
        let min_price = present(self.min_price).and_then(|s| errors.number("minPrice", &s));
        let max_price = present(self.max_price).and_then(|s| errors.number("maxPrice", &s));

        errors.finish(PlotFilter {
            status,
            location: present(self.location),
            min_price,
            max_price,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Wire form of a plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotDto {
    pub id: String,
    pub plot_number: String,
    pub location: String,
    pub size: String,
    pub price: f64,
    pub status: PlotStatus,
    pub description: String,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Plot> for PlotDto {
    fn from(plot: Plot) -> Self {
        Self {
            id: plot.id.to_string(),
            plot_number: plot.plot_number,
            location: plot.location,
            size: plot.size,
            price: plot.price,
            status: plot.status,
            description: plot.description,
            amenities: plot.amenities,
            created_at: plot.created_at,
            updated_at: plot.updated_at,
        }
    }
}

/// Response for GET /api/plots
#[derive(Debug, Clone, Serialize)]
pub struct PlotListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PlotDto>,
}

/// Response for GET /api/plots/{id}
#[derive(Debug, Clone, Serialize)]
pub struct PlotResponse {
    pub success: bool,
    pub data: PlotDto,
}

/// Response for mutating endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PlotMutationResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: PlotDto,
}
