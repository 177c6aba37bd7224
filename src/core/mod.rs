pub mod crawler;
pub mod document;
pub mod engine;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod pagination;
pub mod site;

pub use crate::domain::model::{Product, ProductRecord, User};
pub use crate::domain::ports::{ConfigProvider, Exporter, Fetcher, Storage};
pub use crate::utils::error::Result;
