//! In-Memory Repository
//!
//! Same uniqueness and ordering rules as the `plots` table. Built for tests
//! (this crate's and, via the `test-support` feature, the server's).

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use kernel::id::PlotId;

use crate::domain::entities::{NewPlot, Plot, PlotChanges};
use crate::domain::repository::PlotRepository;
use crate::domain::value_objects::{PlotFilter, PlotStatus};
use crate::error::{PlotError, PlotResult};

#[derive(Clone, Default)]
pub struct MemoryPlotRepository {
    plots: Arc<Mutex<Vec<Plot>>>,
}

impl MemoryPlotRepository {
    /// Store pre-populated with P001..P005, created one minute apart
    pub fn seeded() -> Self {
        let repo = Self::default();
        let base = Utc::now() - Duration::hours(1);
        let rows = [
            ("P001", "North Wing", 50000.0, PlotStatus::Available),
            ("P002", "South Wing", 60000.0, PlotStatus::Available),
            ("P003", "East Wing", 40000.0, PlotStatus::Reserved),
            ("P004", "West Wing", 75000.0, PlotStatus::Available),
            ("P005", "Central Area", 45000.0, PlotStatus::Sold),
        ];
        {
            let mut plots = repo.rows();
            for (i, (number, location, price, status)) in rows.into_iter().enumerate() {
                let at = base + Duration::minutes(i as i64);
                plots.push(Plot {
                    id: PlotId::new(),
                    plot_number: number.to_string(),
                    location: location.to_string(),
                    size: "1000 sq ft".to_string(),
                    price,
                    status,
                    description: String::new(),
                    amenities: vec!["parking".to_string()],
                    created_at: at,
                    updated_at: at,
                });
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn by_number(&self, number: &str) -> Option<Plot> {
        self.rows().iter().find(|p| p.plot_number == number).cloned()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Plot>> {
        self.plots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlotRepository for MemoryPlotRepository {
    async fn list(&self, filter: &PlotFilter) -> PlotResult<Vec<Plot>> {
        let mut found: Vec<Plot> = self
            .rows()
            .iter()
            .filter(|p| matches_filter(filter, p))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: PlotId) -> PlotResult<Option<Plot>> {
        Ok(self.rows().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_number(&self, plot_number: &str) -> PlotResult<Option<Plot>> {
        Ok(self.by_number(plot_number))
    }

    async fn create(&self, new_plot: &NewPlot) -> PlotResult<Plot> {
        let mut plots = self.rows();
        if plots.iter().any(|p| p.plot_number == new_plot.plot_number) {
            return Err(PlotError::PlotNumberTaken);
        }
        let now = Utc::now();
        let plot = Plot {
            id: PlotId::new(),
            plot_number: new_plot.plot_number.clone(),
            location: new_plot.location.clone(),
            size: new_plot.size.clone(),
            price: new_plot.price,
            status: new_plot.status,
            description: new_plot.description.clone(),
            amenities: new_plot.amenities.clone(),
            created_at: now,
            updated_at: now,
        };
        plots.push(plot.clone());
        Ok(plot)
    }

    async fn update(&self, id: PlotId, changes: &PlotChanges) -> PlotResult<Option<Plot>> {
        if changes.is_empty() {
            return Err(PlotError::NothingToUpdate);
        }
        let mut plots = self.rows();
        if let Some(number) = &changes.plot_number {
            if plots.iter().any(|p| p.id != id && &p.plot_number == number) {
                return Err(PlotError::PlotNumberTaken);
            }
        }
        let Some(plot) = plots.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        apply_changes(changes, plot);
        plot.updated_at = next_update_stamp(plot.updated_at, Utc::now());
        Ok(Some(plot.clone()))
    }

    async fn delete(&self, id: PlotId) -> PlotResult<Option<Plot>> {
        let mut plots = self.rows();
        let index = plots.iter().position(|p| p.id == id);
        Ok(index.map(|i| plots.remove(i)))
    }
}

/// In-process equivalent of the SQL `WHERE` clause
fn matches_filter(filter: &PlotFilter, plot: &Plot) -> bool {
    if plot.status != filter.status {
        return false;
    }
    if let Some(location) = &filter.location {
        if !plot
            .location
            .to_lowercase()
            .contains(&location.to_lowercase())
        {
            return false;
        }
    }
    if filter.min_price.is_some_and(|min| plot.price < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| plot.price > max) {
        return false;
    }
    true
}

/// Present fields only; timestamps untouched
fn apply_changes(changes: &PlotChanges, plot: &mut Plot) {
    if let Some(v) = &changes.plot_number {
        plot.plot_number = v.clone();
    }
    if let Some(v) = &changes.location {
        plot.location = v.clone();
    }
    if let Some(v) = &changes.size {
        plot.size = v.clone();
    }
    if let Some(v) = changes.price {
        plot.price = v;
    }
    if let Some(v) = changes.status {
        plot.status = v;
    }
    if let Some(v) = &changes.description {
        plot.description = v.clone();
    }
    if let Some(v) = &changes.amenities {
        plot.amenities = v.clone();
    }
}

/// Strictly greater than `previous` even when the clock has not advanced,
/// like the `GREATEST(..)` bump in the SQL update
fn next_update_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        let repo = MemoryPlotRepository::seeded();
        let north = repo.by_number("P001").unwrap();

        assert!(matches_filter(&PlotFilter::default(), &north));

        let filter = PlotFilter {
            location: Some("NORTH".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&filter, &north));

        let filter = PlotFilter {
            min_price: Some(50000.0),
            max_price: Some(50000.0),
            ..Default::default()
        };
        assert!(matches_filter(&filter, &north));

        let filter = PlotFilter {
            min_price: Some(50000.01),
            ..Default::default()
        };
        assert!(!matches_filter(&filter, &north));

        let filter = PlotFilter {
            status: PlotStatus::Sold,
            ..Default::default()
        };
        assert!(!matches_filter(&filter, &north));
    }

    #[test]
    fn test_next_update_stamp_strictly_increases() {
        let now = Utc::now();
        assert!(next_update_stamp(now, now) > now);
        // Clock behind the stored value
        assert!(next_update_stamp(now, now - Duration::seconds(5)) > now);
        // Clock ahead: use the clock
        let later = now + Duration::seconds(5);
        assert_eq!(next_update_stamp(now, later), later);
    }

    #[test]
    fn test_apply_changes_keeps_omitted_fields() {
        let repo = MemoryPlotRepository::seeded();
        let mut plot = repo.by_number("P001").unwrap();
        let before = plot.clone();

        let changes = PlotChanges {
            status: Some(PlotStatus::Sold),
            ..Default::default()
        };
        apply_changes(&changes, &mut plot);

        assert_eq!(plot.status, PlotStatus::Sold);
        assert_eq!(plot.plot_number, before.plot_number);
        assert_eq!(plot.price, before.price);
        assert_eq!(plot.amenities, before.amenities);
        assert_eq!(plot.updated_at, before.updated_at);
    }
}
