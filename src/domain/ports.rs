use crate::domain::model::{LocationQuery, RawResult, SourceId};
use crate::utils::error::RetrievalError;
use async_trait::async_trait;
use std::time::Duration;

/// Translates a location query into one source-specific fetch-and-parse.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn source(&self) -> SourceId;

    /// 回傳 `false` 的 adapter 會忽略查詢中的分類
    fn accepts_categories(&self) -> bool {
        false
    }

    async fn search_location(&self, query: &LocationQuery) -> Result<Vec<RawResult>, RetrievalError>;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn wikipedia_base_url(&self) -> &str;
    fn justdial_base_url(&self) -> &str;
    fn overpass_endpoint(&self) -> &str;
    fn max_concurrent_requests(&self) -> usize;
}
