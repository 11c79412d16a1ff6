pub mod dispatcher;

pub use crate::domain::model::{LocationQuery, RawResult, ResultEnvelope, ScrapeRequest, SourceId};
pub use crate::domain::ports::{ConfigProvider, SiteAdapter};
pub use crate::utils::error::Result;
pub use dispatcher::{DispatcherBuilder, ScraperDispatcher};
