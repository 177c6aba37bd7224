#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_BASE_URL: &str = "https://mobikom.biz/";
pub const DEFAULT_OUTPUT_FILE: &str = "product_data.csv";
pub const DEFAULT_USER_AGENT: &str = concat!("mobikom-crawler/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 16;
pub const DEFAULT_DOWNLOAD_DELAY_MS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_DOWNLOAD_DELAY_MS: u64 = 60_000;
