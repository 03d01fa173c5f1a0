//! Create Plot Use Case

use crate::domain::entities::{NewPlot, Plot};
use crate::domain::repository::PlotRepository;
use crate::error::{PlotError, PlotResult};
use std::sync::Arc;

pub struct CreatePlotUseCase<R>
where
    R: PlotRepository,
{
    repo: Arc<R>,
}

impl<R> CreatePlotUseCase<R>
where
    R: PlotRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Reject a known plot number up front; a concurrent duplicate that
    /// slips past this check still fails on the unique constraint.
    pub async fn execute(&self, new_plot: NewPlot) -> PlotResult<Plot> {
        if self
            .repo
            .find_by_number(&new_plot.plot_number)
            .await?
            .is_some()
        {
            return Err(PlotError::PlotNumberTaken);
        }

        let plot = self.repo.create(&new_plot).await?;

        tracing::info!(
            plot_id = %plot.id,
            plot_number = %plot.plot_number,
            "Plot created"
        );

        Ok(plot)
    }
}
