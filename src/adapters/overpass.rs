use crate::adapters::http::UpstreamClient;
use crate::utils::error::RetrievalError;
use axum::body::Bytes;
use reqwest::{Method, StatusCode};

/// 原封不動轉給呼叫端的上游回應
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Opaque pass-through to an Overpass-style geodata service.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: UpstreamClient,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(client: UpstreamClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<UpstreamReply, RetrievalError> {
        let url = self.target_url(path, query);
        tracing::debug!("🗺️ overpass: {} {}", method, url);

        let mut request = self.client.inner().request(method, &url);
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        tracing::debug!("🗺️ overpass: {} returned {} ({} bytes)", url, status, body.len());
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}
