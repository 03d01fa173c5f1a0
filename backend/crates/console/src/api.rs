//! Server API seam
//!
//! [`PlotsApi`] is everything the console asks of the backend.
//! [`HttpPlotsApi`] speaks the JSON wire format over reqwest.

use auth::AdminClaims;
use auth::presentation::dto::AdminUserView;
use plots::PlotStatus;
use plots::presentation::dto::PlotDto;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::PlotFilters;

/// Payload of the create form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlotForm {
    pub plot_number: String,
    pub location: String,
    pub size: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amenities: Vec<String>,
}

/// Successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    pub token: String,
    pub user: AdminUserView,
}

#[derive(Deserialize)]
struct VerifyReply {
    user: AdminClaims,
}

#[derive(Deserialize)]
struct DataReply<T> {
    data: T,
}

#[derive(Default, Deserialize)]
struct ErrorReply {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct StatusChange {
    status: PlotStatus,
}

/// Backend operations used by the console
#[trait_variant::make(PlotsApi: Send)]
pub trait LocalPlotsApi {
    async fn login(&self, username: &str, password: &str) -> ConsoleResult<LoginReply>;

    /// Claims behind `token`; fails if the server rejects it
    async fn verify(&self, token: &str) -> ConsoleResult<AdminClaims>;

    async fn list_plots(&self, filters: &PlotFilters) -> ConsoleResult<Vec<PlotDto>>;

    async fn create_plot(&self, token: &str, form: &NewPlotForm) -> ConsoleResult<PlotDto>;

    async fn update_status(
        &self,
        token: &str,
        plot_id: &str,
        status: PlotStatus,
    ) -> ConsoleResult<PlotDto>;
}

/// reqwest-backed [`PlotsApi`]
#[derive(Debug, Clone)]
pub struct HttpPlotsApi {
    client: Client,
    base_url: String,
}

impl HttpPlotsApi {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ConsoleResult<T> {
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ConsoleResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let reply = response.json::<ErrorReply>().await.unwrap_or_default();
    let message = if reply.message.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        reply.message
    };

    tracing::debug!(status = status.as_u16(), message = %message, "API request rejected");

    Err(ConsoleError::Api {
        status: status.as_u16(),
        message,
        details: reply.details,
    })
}

impl PlotsApi for HttpPlotsApi {
    async fn login(&self, username: &str, password: &str) -> ConsoleResult<LoginReply> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { username, password });
        Self::send(request).await
    }

    async fn verify(&self, token: &str) -> ConsoleResult<AdminClaims> {
        let request = self.client.get(self.url("/auth/verify")).bearer_auth(token);
        let reply: VerifyReply = Self::send(request).await?;
        Ok(reply.user)
    }

    async fn list_plots(&self, filters: &PlotFilters) -> ConsoleResult<Vec<PlotDto>> {
        let request = self
            .client
            .get(self.url("/plots"))
            .query(&filters.query_pairs());
        let reply: DataReply<Vec<PlotDto>> = Self::send(request).await?;
        Ok(reply.data)
    }

    async fn create_plot(&self, token: &str, form: &NewPlotForm) -> ConsoleResult<PlotDto> {
        let request = self
            .client
            .post(self.url("/plots"))
            .bearer_auth(token)
            .json(form);
        let reply: DataReply<PlotDto> = Self::send(request).await?;
        Ok(reply.data)
    }

    async fn update_status(
        &self,
        token: &str,
        plot_id: &str,
        status: PlotStatus,
    ) -> ConsoleResult<PlotDto> {
        let request = self
            .client
            .put(self.url(&format!("/plots/{plot_id}")))
            .bearer_auth(token)
            .json(&StatusChange { status });
        let reply: DataReply<PlotDto> = Self::send(request).await?;
        Ok(reply.data)
    }
}
