use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RetrievalError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A fetched upstream page. Only 2xx and 404 responses become pages;
/// every other status is a `RetrievalError`. `url` is the URL that served
/// the response, after redirects.
#[derive(Debug, Clone)]
pub struct UpstreamPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl UpstreamPage {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }
}

/// Shared reqwest client with an explicit timeout and an opt-in retry for
/// transient failures.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl UpstreamClient {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        retry_attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            retry_attempts,
            retry_delay,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.request_timeout(),
            config.user_agent(),
            config.retry_attempts(),
            config.retry_delay(),
        )
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// GET `url`，暫時性失敗最多重試 `retry_attempts` 次
    pub async fn get_page(&self, source: &str, url: &str) -> std::result::Result<UpstreamPage, RetrievalError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(source, url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 {}: {} ({}), retry {}/{}",
                        source,
                        e,
                        e.code(),
                        attempt,
                        self.retry_attempts
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, source: &str, url: &str) -> std::result::Result<UpstreamPage, RetrievalError> {
        tracing::debug!("📡 {}: GET {}", source, url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        // 重新導向後以最終網址為準，相對連結依此解析
        let final_url = response.url().to_string();
        tracing::debug!("📡 {}: response status {} from {}", source, status, final_url);

        if status == StatusCode::NOT_FOUND {
            return Ok(UpstreamPage {
                url: final_url,
                status: status.as_u16(),
                body: String::new(),
            });
        }

        if !status.is_success() {
            return Err(RetrievalError::from_status(source, status.as_u16(), url));
        }

        let body = response.text().await?;
        Ok(UpstreamPage {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RetrievalErrorKind;
    use httpmock::prelude::*;

    fn client(retry_attempts: u32) -> UpstreamClient {
        UpstreamClient::new(
            Duration::from_millis(500),
            "osm-gateway-test",
            retry_attempts,
            Duration::from_millis(10),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_page_success() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/page").header("user-agent", "osm-gateway-test");
            then.status(200).body("<html>ok</html>");
        });

        let page = client(0).get_page("test", &server.url("/page")).await.unwrap();

        page_mock.assert();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html>ok</html>");
        assert!(!page.is_not_found());
    }

    #[tokio::test]
    async fn test_page_url_follows_redirect() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/old");
            then.status(301).header("location", "/new/home");
        });
        server.mock(|when, then| {
            when.method(GET).path("/new/home");
            then.status(200).body("moved");
        });

        let page = client(0).get_page("test", &server.url("/old")).await.unwrap();

        assert_eq!(page.url, server.url("/new/home"));
        assert_eq!(page.body, "moved");
    }

    #[tokio::test]
    async fn test_not_found_is_a_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("no such page");
        });

        let page = client(0).get_page("test", &server.url("/missing")).await.unwrap();
        assert!(page.is_not_found());
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_without_retry_is_single_shot() {
        let server = MockServer::start();
        let failing = server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503);
        });

        let err = client(0).get_page("test", &server.url("/down")).await.unwrap_err();

        failing.assert_hits(1);
        assert_eq!(err.kind(), RetrievalErrorKind::UpstreamStatus(503));
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let server = MockServer::start();
        let failing = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(502);
        });

        let err = client(2).get_page("test", &server.url("/flaky")).await.unwrap_err();

        // 1 次原始請求 + 2 次重試
        failing.assert_hits(3);
        assert_eq!(err.kind(), RetrievalErrorKind::UpstreamStatus(502));
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let server = MockServer::start();
        let limited = server.mock(|when, then| {
            when.method(GET).path("/limited");
            then.status(429);
        });

        let err = client(3).get_page("test", &server.url("/limited")).await.unwrap_err();

        limited.assert_hits(1);
        assert_eq!(err.kind(), RetrievalErrorKind::RateLimited(429));
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_secs(2)).body("late");
        });

        let err = client(0).get_page("test", &server.url("/slow")).await.unwrap_err();
        assert_eq!(err.kind(), RetrievalErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        let err = client(0)
            .get_page("test", "http://127.0.0.1:1/unreachable")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RetrievalErrorKind::Network);
    }
}
