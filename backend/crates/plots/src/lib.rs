//! Plots Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Plot entity, status, filters, repository trait
//! - `application/` - CRUD use cases
//! - `infra/` - PostgreSQL implementation (schema, seed, queries), in-memory test double
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Access Model
//! - Listing and single-record reads are public
//! - Create, update, and delete sit behind the auth crate's bearer gate
//! - Plot numbers are unique; the store enforces it as a hard constraint

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::entities::Plot;
pub use domain::value_objects::PlotStatus;
pub use error::{PlotError, PlotResult};
pub use infra::postgres::PgPlotRepository;
pub use presentation::router::{plots_router, plots_router_generic};
