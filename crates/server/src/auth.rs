//! Authentication, authorization and request tracing.

use crate::error::{ApiError, ApiResult};
use axum::extract::{FromRequestParts, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use dayoff_core::{ROOT_USERNAME, Username};
use dayoff_metadata::MetadataStore;
use dayoff_metadata::repos::UserRepo;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs.
/// Longer trace IDs are truncated to prevent log bloat and potential log injection.
const MAX_TRACE_ID_LEN: usize = 128;

/// Header carrying the trace ID on requests and responses.
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value.
    /// The value is sanitized: truncated to MAX_TRACE_ID_LEN characters and non-printable characters removed.
    pub fn from_client(value: &str) -> Self {
        // Limit by character count, not byte count, so multi-byte input cannot split a char.
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    /// Get the trace ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(headers: &HeaderMap) -> TraceId {
    headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Middleware that runs every request inside a span carrying its trace ID
/// and echoes the ID back in the `X-Trace-Id` response header.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let span = tracing::info_span!("request", trace_id = %trace_id);

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

/// Extract bearer token from Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
}

/// Hash a token for storage lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token presented by the caller.
///
/// Read from the `token` query parameter, falling back to an
/// `Authorization: Bearer` header. An empty `?token=` is still a presented
/// token and fails authorization; an empty bearer value counts as absent.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    /// Build credentials from a query value and a bearer value.
    /// The query parameter wins when both are present.
    pub fn from_sources(query: Option<&str>, bearer: Option<&str>) -> Self {
        let token = query
            .or(bearer.map(str::trim).filter(|t| !t.is_empty()))
            .map(str::to_string);
        Self { token }
    }

    /// Credentials carrying the given token.
    pub fn token(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self::from_sources(Some(token.as_str()), None)
    }

    /// The presented token, if any.
    pub fn as_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.token);
        Ok(Self::from_sources(
            query.as_deref(),
            extract_bearer_token(&parts.headers),
        ))
    }
}

/// Check that `credentials` belong to `username`.
///
/// The username length is validated before the token is looked at, so a
/// malformed username is a bad request whatever token accompanies it.
pub async fn authorize(
    store: &dyn MetadataStore,
    username: &str,
    credentials: &Credentials,
) -> ApiResult<Username> {
    let username = Username::parse(username)?;

    let Some(token) = credentials.as_token() else {
        crate::metrics::record_auth_failure("missing_token");
        return Err(ApiError::Unauthorized("token is required".to_string()));
    };

    let found = store
        .find_user_with_token(username.as_str(), &hash_token(token))
        .await?;

    if found.is_none() {
        crate::metrics::record_auth_failure("mismatch");
        tracing::debug!(username = %username, "Token does not match user");
        return Err(ApiError::Unauthorized("authorize failed".to_string()));
    }

    Ok(username)
}

/// Check that `credentials` belong to the root identity.
pub async fn authorize_root(
    store: &dyn MetadataStore,
    credentials: &Credentials,
) -> ApiResult<Username> {
    authorize(store, ROOT_USERNAME, credentials).await
}
