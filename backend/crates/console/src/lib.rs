//! Admin Console Client
//!
//! Client-side state for the plots admin console:
//! - `api` - HTTP seam ([`PlotsApi`]) and its reqwest implementation
//! - `token_store` - where the session token lives between runs
//! - `state` - [`Console`], the screen state and its actions
//! - `render` - plain text table of plots
//!
//! The console never decides authorization itself; it forwards the stored
//! bearer token and reacts to what the server says.

pub mod api;
pub mod error;
pub mod render;
pub mod state;
pub mod token_store;

pub use api::{HttpPlotsApi, NewPlotForm, PlotsApi};
pub use error::{ConsoleError, ConsoleResult};
pub use render::{StatusCounts, format_price, render_table};
pub use state::{Console, PlotFilters, SessionUser};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
