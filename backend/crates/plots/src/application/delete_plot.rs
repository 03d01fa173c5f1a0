//! Delete Plot Use Case

use crate::domain::entities::Plot;
use crate::domain::repository::PlotRepository;
use crate::error::{PlotError, PlotResult};
use kernel::id::PlotId;
use std::sync::Arc;

pub struct DeletePlotUseCase<R>
where
    R: PlotRepository,
{
    repo: Arc<R>,
}

impl<R> DeletePlotUseCase<R>
where
    R: PlotRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns the deleted snapshot
    pub async fn execute(&self, id: PlotId) -> PlotResult<Plot> {
        let plot = self.repo.delete(id).await?.ok_or(PlotError::NotFound)?;

        tracing::info!(
            plot_id = %plot.id,
            plot_number = %plot.plot_number,
            "Plot deleted"
        );

        Ok(plot)
    }
}
