//! Unit tests for Auth crate

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AdminUserId;
use platform::password::ClearTextPassword;

use crate::domain::repository::AdminUserRepository;
use crate::infra::memory::MemoryAdminRepository;

async fn seeded_repo() -> MemoryAdminRepository {
    use crate::application::{EnsureAdminInput, EnsureAdminUseCase};

    let repo = MemoryAdminRepository::default();
    EnsureAdminUseCase::new(Arc::new(repo.clone()))
        .execute(EnsureAdminInput {
            username: "admin".to_string(),
            email: "admin@plots.com".to_string(),
            password: ClearTextPassword::new("admin123"),
        })
        .await
        .unwrap();
    repo
}

#[cfg(test)]
mod token_tests {
    use super::*;
    use crate::application::{AuthConfig, TokenService};
    use crate::error::AuthError;
    use chrono::Duration;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig::new(secret))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service("test-secret");
        let user_id = AdminUserId::new();

        let (token, claims) = tokens.issue(user_id, "admin").unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);

        let verified = tokens.verify(&token).unwrap();
        assert_eq!(verified, claims);
        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.username, "admin");
    }

    #[test]
    fn test_claims_wire_names() {
        let tokens = service("test-secret");
        let (_, claims) = tokens.issue(AdminUserId::new(), "admin").unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("username").is_some());
        assert!(json.get("iat").is_some());
        assert!(json.get("exp").is_some());
    }

    #[test]
    fn test_token_valid_until_expiry() {
        let tokens = service("test-secret");
        let user_id = AdminUserId::new();

        // Issued just under 24h ago: still valid
        let issued = Utc::now() - Duration::hours(24) + Duration::seconds(60);
        let (token, _) = tokens.issue_at(user_id, "admin", issued).unwrap();
        assert!(tokens.verify(&token).is_ok());

        // Issued just over 24h ago: expired, no leeway
        let issued = Utc::now() - Duration::hours(24) - Duration::seconds(2);
        let (token, _) = tokens.issue_at(user_id, "admin", issued).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = service("secret-a").issue(AdminUserId::new(), "admin").unwrap();
        assert!(matches!(
            service("secret-b").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_and_malformed_rejected() {
        let tokens = service("test-secret");
        let (token, _) = tokens.issue(AdminUserId::new(), "admin").unwrap();
        let (other, _) = service("other").issue(AdminUserId::new(), "intruder").unwrap();

        // Swap in a foreign payload, keep the original signature
        let parts: Vec<&str> = token.split('.').collect();
        let foreign_payload = other.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], foreign_payload, parts[2]);

        assert!(tokens.verify(&tampered).is_err());
        assert!(tokens.verify("not-a-token").is_err());
        assert!(tokens.verify("").is_err());
    }

    #[test]
    fn test_random_secret_config() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.jwt_secret, b.jwt_secret);
        assert!(!format!("{:?}", a).contains(&a.jwt_secret));
    }
}

#[cfg(test)]
mod login_tests {
    use super::*;
    use crate::application::{AuthConfig, LoginInput, LoginUseCase, TokenService};
    use crate::error::AuthError;

    fn use_case(repo: MemoryAdminRepository) -> (LoginUseCase<MemoryAdminRepository>, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(&AuthConfig::new("test-secret")));
        (LoginUseCase::new(Arc::new(repo), tokens.clone()), tokens)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (login, tokens) = use_case(seeded_repo().await);

        let output = login
            .execute(LoginInput {
                username: "admin".to_string(),
                password: ClearTextPassword::new("admin123"),
            })
            .await
            .unwrap();

        assert!(!output.token.is_empty());
        assert_eq!(output.user.username, "admin");
        assert_eq!(output.user.email, "admin@plots.com");

        let claims = tokens.verify(&output.token).unwrap();
        assert_eq!(claims.user_id, output.user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (login, _) = use_case(seeded_repo().await);

        let result = login
            .execute(LoginInput {
                username: "admin".to_string(),
                password: ClearTextPassword::new("wrong"),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (login, _) = use_case(seeded_repo().await);

        let result = login
            .execute(LoginInput {
                username: "nobody".to_string(),
                password: ClearTextPassword::new("admin123"),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_bootstrap_refreshes_digest() {
        use crate::application::{EnsureAdminInput, EnsureAdminUseCase};

        let repo = seeded_repo().await;
        let before = repo.find_by_username("admin").await.unwrap().unwrap();

        let after = EnsureAdminUseCase::new(Arc::new(repo.clone()))
            .execute(EnsureAdminInput {
                username: "admin".to_string(),
                email: "admin@plots.com".to_string(),
                password: ClearTextPassword::new("admin123"),
            })
            .await
            .unwrap();

        assert_eq!(before.id, after.id);
        assert_ne!(
            before.password_hash.as_phc_string(),
            after.password_hash.as_phc_string()
        );
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(repo.len(), 1);
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::application::{AuthConfig, TokenService};
    use crate::presentation::router::auth_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> Router {
        let tokens = Arc::new(TokenService::new(&AuthConfig::new("test-secret")));
        auth_router_generic(seeded_repo().await, tokens)
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::post("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_then_verify() {
        let app = app().await;

        let (status, body) = call(
            app.clone(),
            login_request(r#"{"username":"admin","password":"admin123"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["user"]["username"], "admin");
        assert_eq!(body["user"]["email"], "admin@plots.com");
        assert!(body["user"].get("password_hash").is_none());

        let token = body["token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());

        let (status, body) = call(
            app,
            Request::get("/verify")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "admin");
        assert!(body["user"]["userId"].is_string());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let (status, body) = call(
            app().await,
            login_request(r#"{"username":"admin","password":"wrong"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_validation_is_400() {
        let (status, body) = call(app().await, login_request(r#"{"username":"admin"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["details"][0], "\"password\" is required");

        let (status, _) = call(
            app().await,
            login_request(r#"{"username":"","password":"x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            app().await,
            login_request(r#"{"username":"admin","password":"admin123","role":"root"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(app().await, login_request("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verify_requires_token() {
        let (status, body) = call(
            app().await,
            Request::get("/verify").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token required");

        let (status, body) = call(
            app().await,
            Request::get("/verify")
                .header(header::AUTHORIZATION, "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::Validation(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }
}
