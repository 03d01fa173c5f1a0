//! Infrastructure Layer
//!
//! Database implementations, plus an in-memory one for tests.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;

pub use postgres::PgPlotRepository;
