//! List Plots Use Case

use crate::domain::entities::Plot;
use crate::domain::repository::PlotRepository;
use crate::domain::value_objects::PlotFilter;
use crate::error::PlotResult;
use std::sync::Arc;

/// Public filtered listing
pub struct ListPlotsUseCase<R>
where
    R: PlotRepository,
{
    repo: Arc<R>,
}

impl<R> ListPlotsUseCase<R>
where
    R: PlotRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, filter: &PlotFilter) -> PlotResult<Vec<Plot>> {
        let plots = self.repo.list(filter).await?;

        tracing::debug!(
            status = %filter.status,
            location = ?filter.location,
            min_price = ?filter.min_price,
            max_price = ?filter.max_price,
            count = plots.len(),
            "Listed plots"
        );

        Ok(plots)
    }
}
