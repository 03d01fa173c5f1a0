//! Console State
//!
//! Session, plot list, filters and the last error message, plus the actions
//! that change them. Every action that talks to the server records a
//! user-facing message on failure and also returns the error.

use auth::AdminClaims;
use auth::presentation::dto::AdminUserView;
use plots::PlotStatus;
use plots::presentation::dto::PlotDto;

use crate::api::{NewPlotForm, PlotsApi};
use crate::error::{ConsoleError, ConsoleResult};
use crate::token_store::TokenStore;

const CONNECT_FAILED: &str = "Failed to connect to server";

/// Listing filters as typed into the form; empty text means unset
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFilters {
    pub status: Option<PlotStatus>,
    pub location: String,
    pub min_price: String,
    pub max_price: String,
}

impl Default for PlotFilters {
    fn default() -> Self {
        Self {
            status: Some(PlotStatus::Available),
            location: String::new(),
            min_price: String::new(),
            max_price: String::new(),
        }
    }
}

impl PlotFilters {
    /// Query string pairs, skipping unset values
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        for (key, value) in [
            ("location", &self.location),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

/// Who is signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    /// Known after a fresh login, not after restoring a stored token
    pub email: Option<String>,
}

impl From<AdminUserView> for SessionUser {
    fn from(view: AdminUserView) -> Self {
        Self {
            id: view.id,
            username: view.username,
            email: Some(view.email),
        }
    }
}

impl From<AdminClaims> for SessionUser {
    fn from(claims: AdminClaims) -> Self {
        Self {
            id: claims.user_id.to_string(),
            username: claims.username,
            email: None,
        }
    }
}

pub struct Console<A, S> {
    api: A,
    store: S,
    token: Option<String>,
    user: Option<SessionUser>,
    plots: Vec<PlotDto>,
    filters: PlotFilters,
    error: Option<String>,
}

impl<A, S> Console<A, S>
where
    A: PlotsApi,
    S: TokenStore,
{
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            token: None,
            user: None,
            plots: Vec::new(),
            filters: PlotFilters::default(),
            error: None,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn plots(&self) -> &[PlotDto] {
        &self.plots
    }

    pub fn filters(&self) -> &PlotFilters {
        &self.filters
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Restore the stored session (if the server still accepts it), then
    /// fetch the list.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        let stored = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored token");
                None
            }
        };

        if let Some(token) = stored {
            let verified = self.api.verify(&token).await;
            match verified {
                Ok(claims) => {
                    self.token = Some(token);
                    self.user = Some(claims.into());
                }
                Err(e) => {
                    tracing::info!(error = %e, "Stored session rejected, signing out");
                    self.drop_session();
                }
            }
        }

        self.refresh().await
    }

    /// Re-fetch the list with the current filters
    pub async fn refresh(&mut self) -> ConsoleResult<()> {
        let listed = self.api.list_plots(&self.filters).await;
        match listed {
            Ok(plots) => {
                self.plots = plots;
                Ok(())
            }
            Err(e) => Err(self.fail(e, CONNECT_FAILED)),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ConsoleResult<()> {
        let result = self.api.login(username, password).await;
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(e, "Failed to login")),
        };

        if let Err(e) = self.store.save(&reply.token) {
            tracing::warn!(error = %e, "Could not persist token; session lasts until exit");
        }
        self.token = Some(reply.token);
        self.user = Some(reply.user.into());
        self.error = None;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.drop_session();
    }

    /// Replace the filters and fetch at once
    pub async fn set_filters(&mut self, filters: PlotFilters) -> ConsoleResult<()> {
        self.filters = filters;
        self.refresh().await
    }

    /// Create a plot and append it to the local list
    pub async fn create_plot(&mut self, form: &NewPlotForm) -> ConsoleResult<()> {
        let Some(token) = self.token.clone() else {
            return Err(self.fail(ConsoleError::NotLoggedIn("create plots"), ""));
        };

        let created = self.api.create_plot(&token, form).await;
        match created {
            Ok(plot) => {
                self.plots.push(plot);
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Failed to create plot")),
        }
    }

    /// Send a status-only update; on success copy the new status and
    /// update stamp onto that one row
    pub async fn change_status(&mut self, plot_id: &str, status: PlotStatus) -> ConsoleResult<()> {
        let token = match (&self.token, &self.user) {
            (Some(token), Some(_)) => Some(token.clone()),
            _ => None,
        };
        let Some(token) = token else {
            return Err(self.fail(ConsoleError::NotLoggedIn("update plots"), ""));
        };

        let reply = self.api.update_status(&token, plot_id, status).await;
        let updated = match reply {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail(e, "Failed to update plot status")),
        };

        if let Some(plot) = self.plots.iter_mut().find(|p| p.id == plot_id) {
            plot.status = updated.status;
            plot.updated_at = updated.updated_at;
        }
        Ok(())
    }

    fn drop_session(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Could not remove stored token");
        }
        self.token = None;
        self.user = None;
    }

    fn fail(&mut self, error: ConsoleError, fallback: &str) -> ConsoleError {
        self.error = Some(error.user_message(fallback));
        error
    }
}
