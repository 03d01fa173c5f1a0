//! Get Plot Use Case

use crate::domain::entities::Plot;
use crate::domain::repository::PlotRepository;
use crate::error::{PlotError, PlotResult};
use kernel::id::PlotId;
use std::sync::Arc;

pub struct GetPlotUseCase<R>
where
    R: PlotRepository,
{
    repo: Arc<R>,
}

impl<R> GetPlotUseCase<R>
where
    R: PlotRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: PlotId) -> PlotResult<Plot> {
        self.repo.find_by_id(id).await?.ok_or(PlotError::NotFound)
    }
}
