//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router for the API.

pub mod dto;
pub mod handlers;
pub mod router;
