//! Wire format of the prediction backend.
//!
//! Creation answers `201 Created` with `{"id": "...", "urls": {"stream": "..."}}`;
//! anything else carries an optional `{"detail": "..."}` body. The stream
//! is server-sent events named `output`, `done` and `error`.

use basilisk_application::GatewayError;
use basilisk_domain::StreamEvent;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedPrediction {
    pub id: Option<String>,
    #[serde(default)]
    pub urls: PredictionUrls,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictionUrls {
    pub stream: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Human-readable reason for a non-201 creation response.
///
/// Prefers the JSON `detail` field, then the raw body, then the status text.
pub(crate) fn rejection_detail(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        detail: Some(detail),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return match detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Resolve the stream URL from a creation response against the endpoint it
/// came from, so relative paths work.
pub(crate) fn resolve_stream_url(
    endpoint: &Url,
    created: &CreatedPrediction,
) -> Result<Url, GatewayError> {
    let stream = created
        .urls
        .stream
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            GatewayError::InvalidResponse("prediction response has no stream URL".to_string())
        })?;

    endpoint
        .join(stream)
        .map_err(|e| GatewayError::InvalidResponse(format!("bad stream URL '{stream}': {e}")))
}

/// Map one server-sent event to a stream event.
///
/// Unknown event names yield `None` and are skipped.
pub(crate) fn classify_event(name: &str, data: &str) -> Option<StreamEvent> {
    match name {
        "output" => Some(StreamEvent::Output(data.to_string())),
        "done" => Some(StreamEvent::Done),
        "error" => {
            let reason = if data.trim().is_empty() {
                "Prediction failed".to_string()
            } else {
                data.to_string()
            };
            Some(StreamEvent::Error(reason))
        }
        _ => None,
    }
}
