use crate::utils::validation::non_blank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Message returned when a scrape request has no usable `location`.
pub const MISSING_LOCATION_MESSAGE: &str = "Missing 'location' parameter";

/// Scrape sources known to the gateway. The route table is built from `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    Wikipedia,
    Justdial,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Wikipedia, SourceId::Justdial];

    pub fn slug(&self) -> &'static str {
        match self {
            SourceId::Wikipedia => "wikipedia",
            SourceId::Justdial => "justdial",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 從 query string 解析出的原始請求（尚未驗證）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub location: Option<String>,
    pub categories: Vec<String>,
}

impl ScrapeRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            categories: Vec::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// A validated location query. Categories are lower-cased and deduplicated;
/// an empty set is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    location: String,
    categories: Option<BTreeSet<String>>,
}

impl LocationQuery {
    /// location 缺少或空白時回傳 `None`
    pub fn new<I, S>(location: Option<&str>, categories: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let location = non_blank(location)?;

        let categories: BTreeSet<String> = categories
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        Some(Self {
            location: location.to_string(),
            categories: if categories.is_empty() {
                None
            } else {
                Some(categories)
            },
        })
    }

    pub fn from_request(request: &ScrapeRequest) -> Option<Self> {
        Self::new(request.location.as_deref(), &request.categories)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn categories(&self) -> Option<&BTreeSet<String>> {
        self.categories.as_ref()
    }
}

/// 站點 adapter 產出的標準化紀錄
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl RawResult {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            source_url: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

/// 一次抓取的結果，results 與 error 只會有其一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEnvelope {
    Success { results: Vec<RawResult> },
    Failure { error: String, status_code: u16 },
}

impl ResultEnvelope {
    pub fn success(results: Vec<RawResult>) -> Self {
        ResultEnvelope::Success { results }
    }

    pub fn failure(error: impl Into<String>, status_code: u16) -> Self {
        ResultEnvelope::Failure {
            error: error.into(),
            status_code,
        }
    }

    pub fn missing_location() -> Self {
        Self::failure(MISSING_LOCATION_MESSAGE, 400)
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ResultEnvelope::Success { .. } => 200,
            ResultEnvelope::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn results(&self) -> Option<&[RawResult]> {
        match self {
            ResultEnvelope::Success { results } => Some(results),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error, .. } => Some(error),
        }
    }
}
