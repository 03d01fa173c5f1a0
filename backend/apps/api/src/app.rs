//! HTTP Application
//!
//! Route tree and cross-cutting layers. The feature routers are built by
//! their crates; this module only mounts them.

use std::any::Any;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use kernel::error::app_error::AppError;
use kernel::error::conversions::{ErrorBody, ErrorReport};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Environment;

const SERVICE_NAME: &str = "Available Plots Microservice";

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
    script-src 'self'; img-src 'self' data: https:; connect-src 'self'; font-src 'self'; \
    object-src 'none'; media-src 'self'; frame-src 'none'";

/// Settings the layers depend on
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub environment: Environment,
    pub frontend_origins: Vec<String>,
}

/// `/auth/*` and `/plots/*`, to be mounted under `/api`
pub fn api_router(auth: Router, plots: Router) -> Router {
    Router::new().nest("/auth", auth).nest("/plots", plots)
}

/// Full application: health, API, fallback and layers
pub fn build_router(api: Router, settings: &HttpSettings) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic));

    let app = if settings.environment.is_production() {
        app
    } else {
        app.layer(middleware::from_fn(expose_error_detail))
    };

    with_security_headers(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.frontend_origins))
}

/// Hardening headers on every response that does not set its own
fn with_security_headers(app: Router) -> Router {
    app.layer(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
    version: &'static str,
    database: &'static str,
}

/// GET /health
///
/// Liveness only; the store is not probed.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        database: "connected",
    })
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    let body = ErrorBody::masked();
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body.clone())).into_response();
    response
        .extensions_mut()
        .insert(ErrorReport { body, detail });
    response
}

/// Re-render 5xx bodies with their raw detail (non-production only)
async fn expose_error_detail(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let mut body = report.body;
    body.error = Some(report.detail);
    (response.status(), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn panicking() -> &'static str {
        panic!("index out of bounds")
    }

    fn test_api() -> Router {
        Router::new()
            .route(
                "/boom",
                get(|| async { AppError::internal("relation \"plots\" does not exist") }),
            )
            .route("/panic", get(panicking))
            .route(
                "/missing",
                get(|| async { AppError::not_found("Plot not found") }),
            )
    }

    fn app(environment: Environment) -> Router {
        build_router(
            test_api(),
            &HttpSettings {
                environment,
                frontend_origins: vec!["http://localhost:5173".to_string()],
            },
        )
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(Environment::Production), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_internal_error_masked_in_production() {
        let (status, body) = get_json(app(Environment::Production), "/api/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("error").is_none());
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_internal_error_detail_in_development() {
        let (status, body) = get_json(app(Environment::Development), "/api/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(body["error"].as_str().unwrap().contains("relation"));
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        let (status, body) = get_json(app(Environment::Production), "/api/panic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("error").is_none());

        let (status, body) = get_json(app(Environment::Development), "/api/panic").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "index out of bounds");
    }

    #[tokio::test]
    async fn test_client_errors_untouched() {
        let (status, body) = get_json(app(Environment::Development), "/api/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Plot not found");
        assert!(body.get("error").is_none());

        let (status, body) = get_json(app(Environment::Production), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_security_headers() {
        for environment in [Environment::Production, Environment::Development] {
            for uri in ["/health", "/api/boom", "/api/panic", "/nowhere"] {
                let response = app(environment)
                    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                    .await
                    .unwrap();
                let headers = response.headers();

                assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff", "{uri}");
                assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN", "{uri}");
                assert_eq!(headers[header::REFERRER_POLICY], "no-referrer", "{uri}");
                let csp = headers[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
                assert!(csp.starts_with("default-src 'self'; "), "{uri}");
                assert!(csp.contains("object-src 'none'"), "{uri}");
            }
        }
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = app(Environment::Production)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/missing")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }
}

/// The production route tree over in-memory stores
#[cfg(test)]
mod route_tree_tests {
    use std::sync::Arc;

    use super::*;
    use auth::application::{EnsureAdminInput, EnsureAdminUseCase};
    use auth::infra::memory::MemoryAdminRepository;
    use auth::{AuthConfig, AuthGate, TokenService, auth_router_generic};
    use axum::body::to_bytes;
    use platform::password::ClearTextPassword;
    use plots::infra::memory::MemoryPlotRepository;
    use plots::plots_router_generic;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn server() -> (Router, MemoryPlotRepository) {
        let admins = MemoryAdminRepository::default();
        EnsureAdminUseCase::new(Arc::new(admins.clone()))
            .execute(EnsureAdminInput {
                username: "admin".to_string(),
                email: "admin@plots.com".to_string(),
                password: ClearTextPassword::new("admin123"),
            })
            .await
            .unwrap();

        let plots = MemoryPlotRepository::seeded();
        let tokens = Arc::new(TokenService::new(&AuthConfig::new("route-tree-secret")));
        let api = api_router(
            auth_router_generic(admins, tokens.clone()),
            plots_router_generic(plots.clone(), AuthGate::new(tokens)),
        );
        let app = build_router(
            api,
            &HttpSettings {
                environment: Environment::Production,
                frontend_origins: vec!["http://localhost:5173".to_string()],
            },
        );
        (app, plots)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn new_plot() -> Value {
        json!({
            "plotNumber": "P100",
            "location": "Lake Side",
            "size": "1100 sq ft",
            "price": "55000"
        })
    }

    #[tokio::test]
    async fn test_public_reads_under_api() {
        let (app, plots) = server().await;

        let (status, body) = send(&app, Method::GET, "/api/plots", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);

        let (_, body) = send(&app, Method::GET, "/api/plots?status=sold", None, None).await;
        assert_eq!(body["data"][0]["plot_number"], "P005");

        let id = plots.by_number("P003").unwrap().id;
        let (status, body) = send(&app, Method::GET, &format!("/api/plots/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["plot_number"], "P003");

        let (status, body) = send(&app, Method::GET, "/api/plots/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Plot not found");
    }

    #[tokio::test]
    async fn test_trailing_slash_is_unknown_route() {
        let (app, _) = server().await;

        let (status, body) = send(&app, Method::GET, "/api/plots/", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");

        let (status, body) = send(&app, Method::GET, "/plots", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_writes_gated_then_allowed_after_login() {
        let (app, plots) = server().await;

        let (status, _) = send(&app, Method::POST, "/api/plots", None, Some(new_plot())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(&app, Method::GET, "/api/auth/verify", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(plots.len(), 5);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/api/auth/verify", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "admin");

        let (status, body) =
            send(&app, Method::POST, "/api/plots", Some(&token), Some(new_plot())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["price"], 55000.0);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/plots/{id}"),
            Some(&token),
            Some(json!({"status": "sold"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "sold");

        let (status, _) =
            send(&app, Method::DELETE, &format!("/api/plots/{id}"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plots.len(), 5);
    }
}
