use crate::domain::model::{RawResult, ResultEnvelope};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// 回應格式：`{"results": [...]}` 或 `{"error": "..."}`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnvelopeBody<'a> {
    Results { results: &'a [RawResult] },
    Error { error: &'a str },
}

impl<'a> From<&'a ResultEnvelope> for EnvelopeBody<'a> {
    fn from(envelope: &'a ResultEnvelope) -> Self {
        match envelope {
            ResultEnvelope::Success { results } => EnvelopeBody::Results { results },
            ResultEnvelope::Failure { error, .. } => EnvelopeBody::Error { error },
        }
    }
}

pub fn envelope_response(envelope: &ResultEnvelope) -> Response {
    let status = StatusCode::from_u16(envelope.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(EnvelopeBody::from(envelope))).into_response()
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(EnvelopeBody::Error { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_has_only_results() {
        let envelope = ResultEnvelope::success(vec![RawResult::new("Mumbai", "City")]);
        let body = serde_json::to_value(EnvelopeBody::from(&envelope)).unwrap();
        assert_eq!(body, json!({"results": [{"title": "Mumbai", "detail": "City"}]}));
    }

    #[test]
    fn test_failure_body_has_only_error() {
        let envelope = ResultEnvelope::missing_location();
        let body = serde_json::to_value(EnvelopeBody::from(&envelope)).unwrap();
        assert_eq!(body, json!({"error": "Missing 'location' parameter"}));
    }

    #[test]
    fn test_envelope_response_status() {
        let response = envelope_response(&ResultEnvelope::failure("boom", 500));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = envelope_response(&ResultEnvelope::success(vec![]));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
