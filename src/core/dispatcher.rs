use crate::core::{LocationQuery, ResultEnvelope, ScrapeRequest, SiteAdapter, SourceId};
use crate::utils::error::{GatewayError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

/// Registers one adapter per `SourceId`; `build` refuses an incomplete registry.
#[derive(Default)]
pub struct DispatcherBuilder {
    adapters: HashMap<SourceId, Arc<dyn SiteAdapter>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, adapter: Arc<dyn SiteAdapter>) -> Self {
        let source = adapter.source();
        if self.adapters.insert(source, adapter).is_some() {
            tracing::warn!("Adapter for '{}' registered twice, keeping the last one", source);
        }
        self
    }

    pub fn build(self) -> Result<ScraperDispatcher> {
        if let Some(missing) = SourceId::ALL
            .iter()
            .find(|source| !self.adapters.contains_key(*source))
        {
            return Err(GatewayError::MissingAdapter {
                source_id: missing.to_string(),
            });
        }

        Ok(ScraperDispatcher {
            adapters: self.adapters,
        })
    }
}

/// Validates scrape requests, calls the matching adapter and maps the
/// outcome to a `ResultEnvelope`. Immutable after `build`.
pub struct ScraperDispatcher {
    adapters: HashMap<SourceId, Arc<dyn SiteAdapter>>,
}

impl ScraperDispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn sources(&self) -> impl Iterator<Item = SourceId> + '_ {
        SourceId::ALL.into_iter().filter(|s| self.adapters.contains_key(s))
    }

    pub async fn dispatch(&self, source: SourceId, request: ScrapeRequest) -> ResultEnvelope {
        let Some(query) = LocationQuery::from_request(&request) else {
            tracing::debug!("{}: rejected request without location", source);
            return ResultEnvelope::missing_location();
        };

        let Some(adapter) = self.adapters.get(&source) else {
            // build() 已保證每個 SourceId 都有註冊
            return ResultEnvelope::failure(format!("No adapter registered for source '{}'", source), 500);
        };

        if query.categories().is_some() && !adapter.accepts_categories() {
            tracing::debug!("{}: ignoring category filters", source);
        }

        let span = tracing::info_span!("scrape", source = %source, location = %query.location());
        async {
            match adapter.search_location(&query).await {
                Ok(results) => {
                    tracing::info!("✅ {} records", results.len());
                    ResultEnvelope::success(results)
                }
                Err(e) => {
                    tracing::warn!("❌ retrieval failed: {} (code: {})", e, e.code());
                    ResultEnvelope::failure(e.to_string(), 500)
                }
            }
        }
        .instrument(span)
        .await
    }
}
