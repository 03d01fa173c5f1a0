//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::{NewPlot, Plot, PlotChanges};
use crate::domain::value_objects::PlotFilter;
use crate::error::PlotResult;
use kernel::id::PlotId;

/// Plot repository trait
#[trait_variant::make(PlotRepository: Send)]
pub trait LocalPlotRepository {
    /// Plots matching the filter, newest first
    async fn list(&self, filter: &PlotFilter) -> PlotResult<Vec<Plot>>;

    async fn find_by_id(&self, id: PlotId) -> PlotResult<Option<Plot>>;

    async fn find_by_number(&self, plot_number: &str) -> PlotResult<Option<Plot>>;

    /// Insert a plot; a duplicate number fails with `PlotNumberTaken`
    async fn create(&self, plot: &NewPlot) -> PlotResult<Plot>;

    /// Rewrite present fields and bump `updated_at`; `None` if the id is unknown
    async fn update(&self, id: PlotId, changes: &PlotChanges) -> PlotResult<Option<Plot>>;

    /// Delete and return the removed snapshot; `None` if the id is unknown
    async fn delete(&self, id: PlotId) -> PlotResult<Option<Plot>>;
}
