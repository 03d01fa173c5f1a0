//! Update Plot Use Case

use crate::domain::entities::{Plot, PlotChanges};
use crate::domain::repository::PlotRepository;
use crate::error::{PlotError, PlotResult};
use kernel::id::PlotId;
use std::sync::Arc;

pub struct UpdatePlotUseCase<R>
where
    R: PlotRepository,
{
    repo: Arc<R>,
}

impl<R> UpdatePlotUseCase<R>
where
    R: PlotRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: PlotId, changes: PlotChanges) -> PlotResult<Plot> {
        if changes.is_empty() {
            return Err(PlotError::NothingToUpdate);
        }

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PlotError::NotFound)?;

        if let Some(number) = &changes.plot_number {
            if *number != existing.plot_number
                && self.repo.find_by_number(number).await?.is_some()
            {
                return Err(PlotError::PlotNumberTaken);
            }
        }

        let plot = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or(PlotError::NotFound)?;

        tracing::info!(
            plot_id = %plot.id,
            plot_number = %plot.plot_number,
            status = %plot.status,
            "Plot updated"
        );

        Ok(plot)
    }
}
