//! Bearer token extraction
//!
//! Parses `Authorization: Bearer <token>` headers.

use axum::http::{HeaderMap, header};
use thiserror::Error;

/// Why no usable bearer token was found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Missing authorization header")]
    Missing,

    #[error("Invalid authorization header")]
    Malformed,
}

/// Extract the bearer token from request headers
///
/// The scheme is matched case-insensitively; surrounding whitespace around
/// the token is ignored. An empty token is malformed.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(BearerError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));

        let headers = headers_with("bearer   abc.def.ghi ");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(BearerError::Missing));
    }

    #[test]
    fn test_extract_bearer_malformed() {
        assert_eq!(
            extract_bearer(&headers_with("Basic dXNlcjpwYXNz")),
            Err(BearerError::Malformed)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer")),
            Err(BearerError::Malformed)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer    ")),
            Err(BearerError::Malformed)
        );
    }
}
