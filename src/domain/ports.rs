use crate::domain::model::{Credentials, FetchRequest, Product};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    /// Creates or truncates the file.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Appends to the file and flushes before returning.
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn credentials(&self) -> Result<Credentials>;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn download_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
}

/// Issues a request and returns the response body as text.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}

#[async_trait]
pub trait Exporter: Send {
    async fn export_item(&mut self, product: Product) -> Result<()>;
    /// Flushes the export and returns where it was written.
    async fn finish(&mut self) -> Result<String>;
}
