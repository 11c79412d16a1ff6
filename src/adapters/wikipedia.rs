use crate::adapters::html::{capitalize_first, element_text, first_text, selector};
use crate::adapters::http::UpstreamClient;
use crate::domain::model::{LocationQuery, RawResult, SourceId};
use crate::domain::ports::SiteAdapter;
use crate::utils::error::RetrievalError;
use async_trait::async_trait;
use scraper::Html;
use url::Url;

pub struct WikipediaAdapter {
    client: UpstreamClient,
    base_url: String,
}

impl WikipediaAdapter {
    pub fn new(client: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `"new delhi"` -> `{base}/wiki/New_delhi`
    ///
    /// MediaWiki 只正規化標題的第一個字元，其餘大小寫照使用者輸入
    pub fn article_url(&self, location: &str) -> Result<String, RetrievalError> {
        let words: Vec<&str> = location.split_whitespace().collect();
        let title = capitalize_first(&words.join("_"));

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RetrievalError::parse(format!("Invalid Wikipedia base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| RetrievalError::parse(format!("Wikipedia base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push("wiki")
            .push(&title);

        Ok(url.to_string())
    }

    /// 先摘要，再依頁面順序列出 infobox 各列
    pub fn parse_article(html: &str, page_url: &str) -> Result<Vec<RawResult>, RetrievalError> {
        let document = Html::parse_document(html);

        let heading_selector = selector("h1#firstHeading")?;
        let content_selector = selector("div.mw-parser-output")?;
        let paragraph_selector = selector("div.mw-parser-output > p")?;
        let infobox_row_selector = selector("table.infobox tr")?;
        let label_selector = selector("th")?;
        let value_selector = selector("td")?;

        let heading = document
            .select(&heading_selector)
            .next()
            .map(|h| element_text(&h))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                RetrievalError::parse(format!("Wikipedia page {} has no article heading", page_url))
            })?;

        if document.select(&content_selector).next().is_none() {
            return Err(RetrievalError::parse(format!(
                "Wikipedia page {} has no article content",
                page_url
            )));
        }

        let mut results = Vec::new();

        if let Some(summary) = document
            .select(&paragraph_selector)
            .map(|p| element_text(&p))
            .find(|text| !text.is_empty())
        {
            results.push(RawResult::new(heading.clone(), summary).with_source_url(page_url));
        }

        for row in document.select(&infobox_row_selector) {
            let (Some(label), Some(value)) = (
                first_text(&row, &label_selector),
                first_text(&row, &value_selector),
            ) else {
                continue;
            };
            results.push(RawResult::new(label, value).with_source_url(page_url));
        }

        Ok(results)
    }
}

#[async_trait]
impl SiteAdapter for WikipediaAdapter {
    fn source(&self) -> SourceId {
        SourceId::Wikipedia
    }

    async fn search_location(&self, query: &LocationQuery) -> Result<Vec<RawResult>, RetrievalError> {
        let url = self.article_url(query.location())?;
        let page = self.client.get_page("wikipedia", &url).await?;

        // 查無條目視為空結果，而非錯誤
        if page.is_not_found() {
            tracing::info!("📭 wikipedia: no article for '{}'", query.location());
            return Ok(Vec::new());
        }

        let results = Self::parse_article(&page.body, &page.url)?;
        tracing::debug!("wikipedia: parsed {} records from {}", results.len(), page.url);
        Ok(results)
    }
}
