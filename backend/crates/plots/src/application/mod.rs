//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Validation and conflict checks run before any mutating store call.

pub mod create_plot;
pub mod delete_plot;
pub mod get_plot;
pub mod list_plots;
pub mod update_plot;

pub use create_plot::CreatePlotUseCase;
pub use delete_plot::DeletePlotUseCase;
pub use get_plot::GetPlotUseCase;
pub use list_plots::ListPlotsUseCase;
pub use update_plot::UpdatePlotUseCase;
