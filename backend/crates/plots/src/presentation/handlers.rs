//! HTTP Handlers

use crate::application::{
    CreatePlotUseCase, DeletePlotUseCase, GetPlotUseCase, ListPlotsUseCase, UpdatePlotUseCase,
};
use crate::domain::repository::PlotRepository;
use crate::error::{PlotError, PlotResult};
use crate::presentation::dto::{
    CreatePlotRequest, ListPlotsQuery, PlotDto, PlotListResponse, PlotMutationResponse,
    PlotResponse, UpdatePlotRequest,
};
use auth::AdminClaims;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use kernel::extract::{ApiJson, ApiQuery};
use kernel::id::PlotId;
use std::sync::Arc;

/// Shared state for plot handlers
#[derive(Clone)]
pub struct PlotsAppState<R>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// Ids that are not UUIDs cannot match any record
fn parse_plot_id(raw: &str) -> PlotResult<PlotId> {
    raw.parse().map_err(|_| PlotError::NotFound)
}

/// GET /api/plots
pub async fn list_plots<R>(
    State(state): State<PlotsAppState<R>>,
    ApiQuery(query): ApiQuery<ListPlotsQuery>,
) -> PlotResult<Json<PlotListResponse>>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let filter = query.into_filter().map_err(PlotError::Validation)?;

    let plots = ListPlotsUseCase::new(state.repo.clone())
        .execute(&filter)
        .await?;

    Ok(Json(PlotListResponse {
        success: true,
        count: plots.len(),
        data: plots.into_iter().map(PlotDto::from).collect(),
    }))
}

/// GET /api/plots/{id}
pub async fn get_plot<R>(
    State(state): State<PlotsAppState<R>>,
    Path(id): Path<String>,
) -> PlotResult<Json<PlotResponse>>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let id = parse_plot_id(&id)?;

    let plot = GetPlotUseCase::new(state.repo.clone()).execute(id).await?;

    Ok(Json(PlotResponse {
        success: true,
        data: plot.into(),
    }))
}

/// POST /api/plots
pub async fn create_plot<R>(
    State(state): State<PlotsAppState<R>>,
    Extension(admin): Extension<AdminClaims>,
    ApiJson(req): ApiJson<CreatePlotRequest>,
) -> PlotResult<(StatusCode, Json<PlotMutationResponse>)>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let new_plot = req.validate().map_err(PlotError::Validation)?;

    let plot = CreatePlotUseCase::new(state.repo.clone())
        .execute(new_plot)
        .await?;

    tracing::debug!(admin = %admin.username, plot_id = %plot.id, "Create request served");

    Ok((
        StatusCode::CREATED,
        Json(PlotMutationResponse {
            success: true,
            message: "Plot created successfully",
            data: plot.into(),
        }),
    ))
}

/// PUT /api/plots/{id}
pub async fn update_plot<R>(
    State(state): State<PlotsAppState<R>>,
    Extension(admin): Extension<AdminClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePlotRequest>,
) -> PlotResult<Json<PlotMutationResponse>>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let changes = req.validate().map_err(PlotError::Validation)?;
    let id = parse_plot_id(&id)?;

    let plot = UpdatePlotUseCase::new(state.repo.clone())
        .execute(id, changes)
        .await?;

    tracing::debug!(admin = %admin.username, plot_id = %plot.id, "Update request served");

    Ok(Json(PlotMutationResponse {
        success: true,
        message: "Plot updated successfully",
        data: plot.into(),
    }))
}

/// DELETE /api/plots/{id}
pub async fn delete_plot<R>(
    State(state): State<PlotsAppState<R>>,
    Extension(admin): Extension<AdminClaims>,
    Path(id): Path<String>,
) -> PlotResult<Json<PlotMutationResponse>>
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let id = parse_plot_id(&id)?;

    let plot = DeletePlotUseCase::new(state.repo.clone()).execute(id).await?;

    tracing::debug!(admin = %admin.username, plot_id = %plot.id, "Delete request served");

    Ok(Json(PlotMutationResponse {
        success: true,
        message: "Plot deleted successfully",
        data: plot.into(),
    }))
}
