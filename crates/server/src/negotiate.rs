//! Content negotiation and response rendering.
//!
//! Every endpoint answers either in bare text (the historical wire format:
//! `1`, `0`, a token, an error message) or in a small JSON envelope. The
//! choice is made from the `Accept` header by [`negotiate`], and
//! [`render`] turns an [`Outcome`] into status and body. Both are pure.

use crate::error::{ApiError, ApiResult};
use crate::resolution::{OverrideEntry, Resolution};
use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dayoff_core::{AccessToken, OverrideStatus};
use dayoff_metadata::models::UpsertOutcome;
use serde_json::{Map, Value, json};
use std::convert::Infallible;

const PLAIN: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

/// Response body format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    /// Bare text.
    #[default]
    Plain,
    /// JSON envelope.
    Json,
}

impl Representation {
    fn media_type(&self) -> (&'static str, &'static str) {
        match self {
            Self::Plain => ("text", "plain"),
            Self::Json => ("application", "json"),
        }
    }

    /// Render an operation result as a response.
    pub fn respond(self, result: ApiResult<Outcome>) -> Response {
        let outcome = result.unwrap_or_else(|err| {
            if let ApiError::Internal(detail) = &err {
                tracing::error!(error = %detail, "Request failed");
            }
            Outcome::Failed(err)
        });
        render(self, &outcome).into_response()
    }
}

impl<S> FromRequestParts<S> for Representation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts.headers.get(ACCEPT).and_then(|v| v.to_str().ok());
        Ok(negotiate(accept))
    }
}

/// One parsed media range of an `Accept` header.
struct MediaRange<'a> {
    kind: &'a str,
    subtype: &'a str,
    quality: f32,
}

impl<'a> MediaRange<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (kind, subtype) = parts.next()?.trim().split_once('/')?;
        let mut quality = 1.0;
        for param in parts {
            if let Some((name, value)) = param.split_once('=')
                && name.trim().eq_ignore_ascii_case("q")
            {
                quality = value.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
            }
        }
        Some(Self {
            kind: kind.trim(),
            subtype: subtype.trim(),
            quality,
        })
    }

    /// How precisely this range names `(kind, subtype)`, or `None` if it
    /// does not match at all.
    fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        match (self.kind, self.subtype) {
            ("*", "*") => Some(0),
            (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => Some(2),
            _ => None,
        }
    }
}

/// Quality the client assigns to `offer`: the q-value of the most specific
/// matching range, or zero.
fn quality(ranges: &[MediaRange<'_>], offer: Representation) -> f32 {
    let (kind, subtype) = offer.media_type();
    ranges
        .iter()
        .filter_map(|r| r.specificity(kind, subtype).map(|s| (s, r.quality)))
        .max_by_key(|(specificity, _)| *specificity)
        .map_or(0.0, |(_, q)| q)
}

/// Pick the representation for an `Accept` header value.
///
/// Plain text is the default: it is used when the header is absent, when
/// neither offer is acceptable and when both are equally acceptable.
pub fn negotiate(accept: Option<&str>) -> Representation {
    let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
        return Representation::Plain;
    };
    let ranges: Vec<MediaRange<'_>> = accept.split(',').filter_map(MediaRange::parse).collect();

    let plain = quality(&ranges, Representation::Plain);
    let json = quality(&ranges, Representation::Json);
    if json > plain {
        Representation::Json
    } else {
        Representation::Plain
    }
}

/// Result of an endpoint, before rendering.
#[derive(Debug)]
pub enum Outcome {
    Greeting,
    Resolved(Resolution),
    Registered(AccessToken),
    OverrideSet {
        status: OverrideStatus,
        outcome: UpsertOutcome,
    },
    Overrides(Vec<OverrideEntry>),
    Failed(ApiError),
}

/// A rendered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Render `outcome` in the given representation.
pub fn render(representation: Representation, outcome: &Outcome) -> Rendered {
    let status = match outcome {
        Outcome::Registered(_) => StatusCode::CREATED,
        Outcome::Failed(err) => err.status_code(),
        _ => StatusCode::OK,
    };

    let (content_type, body) = match representation {
        Representation::Plain => (PLAIN, plain_body(outcome)),
        Representation::Json => (JSON, json_body(outcome).to_string()),
    };

    Rendered {
        status,
        content_type,
        body,
    }
}

fn bit(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn plain_body(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Greeting => "Hello, World!".to_string(),
        Outcome::Resolved(resolution) => bit(resolution.is_holiday).to_string(),
        Outcome::Registered(token) => token.as_str().to_string(),
        Outcome::OverrideSet { status, .. } => status.to_string(),
        Outcome::Overrides(entries) => entries
            .iter()
            .map(|e| format!("{} {}", e.day, e.status))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Failed(err) => err.to_string(),
    }
}

fn json_body(outcome: &Outcome) -> Value {
    let mut body = Map::new();
    let (code, message) = match outcome {
        Outcome::Greeting => ("ok", "Hello, World!".to_string()),
        Outcome::Resolved(resolution) => {
            body.insert("is_holiday".into(), json!(resolution.is_holiday));
            body.insert("source".into(), json!(resolution.source.as_str()));
            ("ok", bit(resolution.is_holiday).to_string())
        }
        Outcome::Registered(token) => {
            body.insert("token".into(), json!(token.as_str()));
            ("created", token.as_str().to_string())
        }
        Outcome::OverrideSet { status, outcome } => {
            body.insert("status".into(), json!(status.code()));
            body.insert("outcome".into(), json!(outcome.as_str()));
            ("ok", status.to_string())
        }
        Outcome::Overrides(entries) => {
            let list: Vec<Value> = entries
                .iter()
                .map(|e| json!({ "day": e.day.as_str(), "status": e.status.code() }))
                .collect();
            body.insert("overrides".into(), Value::Array(list));
            ("ok", format!("{} overrides", entries.len()))
        }
        Outcome::Failed(err) => (err.code(), err.to_string()),
    };
    body.insert("code".into(), json!(code));
    body.insert("message".into(), json!(message));
    Value::Object(body)
}
