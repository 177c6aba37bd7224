use crate::adapters::http::HttpFetcher;
use crate::adapters::storage::LocalStorage;
use crate::core::crawler::{CrawlStats, Crawler};
use crate::core::export::CsvExporter;
use crate::core::site::SiteMap;
use crate::core::{ConfigProvider, Exporter, Fetcher};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub output_path: String,
    pub stats: CrawlStats,
}

pub struct CrawlEngine<F: Fetcher, E: Exporter> {
    crawler: Crawler<F, E>,
}

impl CrawlEngine<HttpFetcher, CsvExporter<LocalStorage>> {
    /// Wires the HTTP fetcher and the CSV exporter from configuration. The
    /// output file is created, with its header, before anything is fetched.
    pub async fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let site = SiteMap::new(config.base_url())?;
        let fetcher = HttpFetcher::new(config)?;
        let credentials = config.credentials()?;
        let storage = LocalStorage::new(config.output_path().to_string());
        let exporter =
            CsvExporter::create(storage, config.output_path(), config.output_file()).await?;

        Ok(Self::new(Crawler::new(fetcher, exporter, site, credentials)))
    }
}

impl<F: Fetcher, E: Exporter> CrawlEngine<F, E> {
    pub fn new(crawler: Crawler<F, E>) -> Self {
        Self { crawler }
    }

    pub async fn run(self) -> Result<CrawlSummary> {
        tracing::info!("Starting crawl");
        let (mut exporter, stats) = self.crawler.run().await?;

        let output_path = exporter.finish().await?;
        tracing::info!("Exported {} products to {}", stats.exported, output_path);

        Ok(CrawlSummary { output_path, stats })
    }
}
