pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use crate::core::dispatcher::{DispatcherBuilder, ScraperDispatcher};
pub use domain::model::{LocationQuery, RawResult, ResultEnvelope, ScrapeRequest, SourceId};
pub use server::{create_router, AppState};
pub use utils::error::{GatewayError, Result, RetrievalError, RetrievalErrorKind};
