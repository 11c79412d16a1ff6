use crate::adapters::html::{element_text, first_text, selector, title_case_words};
use crate::adapters::http::UpstreamClient;
use crate::domain::model::{LocationQuery, RawResult, SourceId};
use crate::domain::ports::SiteAdapter;
use crate::utils::error::RetrievalError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::Html;
use std::collections::HashSet;
use url::Url;

const LISTING_CARD: &str = ".resultbox_info";
const LISTING_TITLE: &str = ".resultbox_title_anchor";
const LISTING_ADDRESS: &str = ".resultbox_address";

pub struct JustdialAdapter {
    client: UpstreamClient,
    base_url: String,
    max_concurrent_requests: usize,
}

impl JustdialAdapter {
    pub fn new(client: UpstreamClient, base_url: impl Into<String>, max_concurrent_requests: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// 每個分類一個 URL（依集合順序）；沒有分類時只有一個 URL
    pub fn listing_urls(&self, query: &LocationQuery) -> Result<Vec<String>, RetrievalError> {
        match query.categories() {
            Some(categories) => categories
                .iter()
                .map(|category| self.listing_url(query.location(), Some(category.as_str())))
                .collect(),
            None => Ok(vec![self.listing_url(query.location(), None)?]),
        }
    }

    fn listing_url(&self, location: &str, category: Option<&str>) -> Result<String, RetrievalError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RetrievalError::parse(format!("Invalid JustDial base URL '{}': {}", self.base_url, e))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RetrievalError::parse(format!("JustDial base URL '{}' cannot hold a path", self.base_url))
            })?;
            segments.pop_if_empty().push(&title_case_words(location).join("-"));
            if let Some(category) = category {
                segments.push(&title_case_words(category).join("-"));
            }
        }

        Ok(url.to_string())
    }

    pub fn parse_listings(html: &str, page_url: &str) -> Result<Vec<RawResult>, RetrievalError> {
        let document = Html::parse_document(html);
        let card_selector = selector(LISTING_CARD)?;
        let title_selector = selector(LISTING_TITLE)?;
        let address_selector = selector(LISTING_ADDRESS)?;
        let base = Url::parse(page_url).ok();

        let mut results = Vec::new();
        for card in document.select(&card_selector) {
            let Some(anchor) = card.select(&title_selector).next() else {
                continue;
            };
            let title = element_text(&anchor);
            if title.is_empty() {
                continue;
            }

            let detail = first_text(&card, &address_selector).unwrap_or_else(|| {
                let full = element_text(&card);
                full.strip_prefix(title.as_str()).unwrap_or(&full).trim().to_string()
            });

            let mut record = RawResult::new(title, detail);
            if let Some(href) = anchor.value().attr("href") {
                let resolved = match &base {
                    Some(base) => base.join(href).map(|u| u.to_string()).ok(),
                    None => Some(href.to_string()),
                };
                record.source_url = resolved;
            }
            results.push(record);
        }

        Ok(results)
    }

    async fn fetch_listings(&self, url: String) -> Result<Vec<RawResult>, RetrievalError> {
        let page = self.client.get_page("justdial", &url).await?;
        if page.is_not_found() {
            tracing::debug!("justdial: no listing page at {}", url);
            return Ok(Vec::new());
        }
        Self::parse_listings(&page.body, &page.url)
    }
}

/// Concatenates per-query groups in order, keeping the first occurrence of
/// each `(title, sourceUrl)` pair.
pub fn merge_listings(groups: Vec<Vec<RawResult>>) -> Vec<RawResult> {
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    groups
        .into_iter()
        .flatten()
        .filter(|record| seen.insert((record.title.clone(), record.source_url.clone())))
        .collect()
}

#[async_trait]
impl SiteAdapter for JustdialAdapter {
    fn source(&self) -> SourceId {
        SourceId::Justdial
    }

    fn accepts_categories(&self) -> bool {
        true
    }

    async fn search_location(&self, query: &LocationQuery) -> Result<Vec<RawResult>, RetrievalError> {
        let urls = self.listing_urls(query)?;
        tracing::debug!(
            "justdial: {} listing queries for '{}' (concurrency {})",
            urls.len(),
            query.location(),
            self.max_concurrent_requests
        );

        // buffered 保留輸入順序，任何一個子查詢失敗即整體失敗
        let groups: Vec<Vec<RawResult>> = stream::iter(urls)
            .map(|url| self.fetch_listings(url))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        Ok(merge_listings(groups))
    }
}
