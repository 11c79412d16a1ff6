use crate::domain::model::{ScrapeRequest, SourceId};
use crate::server::envelope::{envelope_response, error_response};
use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

pub const SERVICE_IDENTIFICATION: &str = "Mumbai OSM Data API Service";

pub async fn index() -> &'static str {
    SERVICE_IDENTIFICATION
}

/// `location` 取第一次出現的值；`category` 可重複
pub fn parse_scrape_query(raw: Option<&str>) -> ScrapeRequest {
    let mut request = ScrapeRequest::default();
    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "location" if request.location.is_none() => request.location = Some(value.into_owned()),
            "category" => request.categories.push(value.into_owned()),
            _ => {}
        }
    }
    request
}

pub async fn scrape(state: AppState, source: SourceId, raw_query: Option<String>) -> Response {
    let request = parse_scrape_query(raw_query.as_deref());
    let envelope = state.dispatcher.dispatch(source, request).await;
    envelope_response(&envelope)
}

pub async fn overpass_proxy(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match state
        .overpass
        .forward(method, &path, query.as_deref(), content_type, body)
        .await
    {
        Ok(reply) => {
            let mut response = (reply.status, reply.body).into_response();
            if let Some(value) = reply
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
            {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            response
        }
        Err(e) => {
            tracing::warn!("🗺️ overpass pass-through failed: {} (code: {})", e, e.code());
            error_response(StatusCode::BAD_GATEWAY, e.message())
        }
    }
}
