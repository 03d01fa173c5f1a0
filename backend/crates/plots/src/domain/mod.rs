//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Plot, NewPlot, PlotChanges)
//! - Domain value objects (PlotStatus, PlotFilter)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
