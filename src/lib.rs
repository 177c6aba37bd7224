pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{http::HttpFetcher, storage::LocalStorage};
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{crawler::Crawler, engine::CrawlEngine, export::CsvExporter};
pub use crate::utils::error::{CrawlError, Result};
