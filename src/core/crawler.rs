//! The crawl state machine.
//!
//! Each [`CrawlStep`] is issued as one request; its response resumes exactly
//! that step. Products travel inside the steps, so no product state is
//! shared between in-flight requests. All other state (page cursor,
//! duplicate filter, statistics, exporter) belongs to the single driver loop.

use crate::core::extract;
use crate::core::pagination::{parse_page_numbers, PageCursor};
use crate::core::site::SiteMap;
use crate::domain::model::{Credentials, FetchRequest, Product};
use crate::domain::ports::{Exporter, Fetcher};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Debug, Clone, PartialEq)]
pub enum CrawlStep {
    Home,
    Login,
    Profile,
    Catalog { page: u32 },
    Detail { product: Product },
    Price { product: Product },
}

impl CrawlStep {
    fn name(&self) -> &'static str {
        match self {
            CrawlStep::Home => "home",
            CrawlStep::Login => "login",
            CrawlStep::Profile => "profile",
            CrawlStep::Catalog { .. } => "catalog",
            CrawlStep::Detail { .. } => "detail",
            CrawlStep::Price { .. } => "price",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub catalog_pages: usize,
    pub candidates_discarded: usize,
    pub dropped_at_detail: usize,
    pub exported: usize,
    pub failed_requests: usize,
    pub filtered_requests: usize,
}

type StepOutcome = (CrawlStep, Result<String>);

pub struct Crawler<F: Fetcher, E: Exporter> {
    fetcher: Arc<F>,
    exporter: E,
    site: SiteMap,
    credentials: Credentials,
    pages: PageCursor,
    seen: HashSet<String>,
    stats: CrawlStats,
}

impl<F: Fetcher, E: Exporter> Crawler<F, E> {
    pub fn new(fetcher: F, exporter: E, site: SiteMap, credentials: Credentials) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            exporter,
            site,
            credentials,
            pages: PageCursor::default(),
            seen: HashSet::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Runs the crawl to completion and hands back the exporter.
    pub async fn run(mut self) -> Result<(E, CrawlStats)> {
        let mut in_flight: JoinSet<StepOutcome> = JoinSet::new();
        self.schedule(&mut in_flight, CrawlStep::Home);

        while let Some(joined) = in_flight.join_next().await {
            let (step, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!("Request task failed: {}", e);
                    self.stats.failed_requests += 1;
                    continue;
                }
            };

            let body = match outcome {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("{} request failed: {}", step.name(), e);
                    self.stats.failed_requests += 1;
                    continue;
                }
            };

            for next in self.advance(step, &body).await? {
                self.schedule(&mut in_flight, next);
            }
        }

        tracing::info!(
            "Crawl finished: {} catalog pages, {} products exported, {} discarded at listing, {} dropped at detail, {} failed requests",
            self.stats.catalog_pages,
            self.stats.exported,
            self.stats.candidates_discarded,
            self.stats.dropped_at_detail,
            self.stats.failed_requests
        );
        Ok((self.exporter, self.stats))
    }

    fn request_for(&self, step: &CrawlStep) -> Result<FetchRequest> {
        match step {
            CrawlStep::Home => Ok(self.site.home()),
            CrawlStep::Login => self.site.login(&self.credentials),
            CrawlStep::Profile => self.site.profile(),
            CrawlStep::Catalog { page } => self.site.catalog_page(*page),
            CrawlStep::Detail { product } => self.site.product(product.href.as_deref().unwrap_or_default()),
            CrawlStep::Price { product } => Ok(self
                .site
                .product(product.href.as_deref().unwrap_or_default())?
                .isolated()),
        }
    }

    fn schedule(&mut self, in_flight: &mut JoinSet<StepOutcome>, step: CrawlStep) {
        let request = match self.request_for(&step) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Can not build {} request: {}", step.name(), e);
                self.stats.failed_requests += 1;
                return;
            }
        };

        // Detail and price fetch the same product URL on purpose.
        let filtered = !matches!(step, CrawlStep::Detail { .. } | CrawlStep::Price { .. });
        if filtered && !self.seen.insert(request.fingerprint()) {
            tracing::debug!("Filtered duplicate request: {}", request.fingerprint());
            self.stats.filtered_requests += 1;
            return;
        }

        let fetcher = Arc::clone(&self.fetcher);
        in_flight.spawn(async move {
            let outcome = fetcher.fetch(&request).await;
            (step, outcome)
        });
    }

    async fn advance(&mut self, step: CrawlStep, body: &str) -> Result<Vec<CrawlStep>> {
        let next = match step {
            CrawlStep::Home => vec![CrawlStep::Login],
            CrawlStep::Login => vec![CrawlStep::Profile],
            CrawlStep::Profile => {
                match extract::parse_profile(body) {
                    Ok(Some(user)) => {
                        tracing::debug!("Logged in as {:?} with {} orders", user.email, user.orders.len())
                    }
                    Ok(None) => tracing::error!("Profile data is not found"),
                    Err(e) => tracing::error!("Profile data can not be parsed: {}", e),
                }
                vec![CrawlStep::Catalog { page: 1 }]
            }
            CrawlStep::Catalog { page } => self.catalog_page(page, body),
            CrawlStep::Detail { product } => match extract::parse_detail(body, product) {
                Some(product) => vec![CrawlStep::Price { product }],
                None => {
                    self.stats.dropped_at_detail += 1;
                    Vec::new()
                }
            },
            CrawlStep::Price { mut product } => {
                product.grivna_price = extract::parse_grivna_price(body);
                if product.grivna_price.is_none() {
                    tracing::info!("Grivna price is not found for {:?}", product.href);
                }
                product.date_parsed = Some(chrono::Local::now());
                self.exporter.export_item(product).await?;
                self.stats.exported += 1;
                Vec::new()
            }
        };
        Ok(next)
    }

    fn catalog_page(&mut self, page: u32, body: &str) -> Vec<CrawlStep> {
        self.stats.catalog_pages += 1;

        if !self.pages.is_known() {
            if self.pages.discover(parse_page_numbers(body)) {
                tracing::info!("Catalog pagination discovered on page {}", page);
            } else {
                tracing::error!("One page found");
            }
        }

        let listing = extract::parse_listing(body);
        self.stats.candidates_discarded += listing.discarded;
        tracing::info!(
            "Catalog page {}: {} products, {} discarded",
            page,
            listing.products.len(),
            listing.discarded
        );

        let mut next: Vec<CrawlStep> = listing
            .products
            .into_iter()
            .map(|product| CrawlStep::Detail { product })
            .collect();

        match self.pages.next_page() {
            Some(page) => next.push(CrawlStep::Catalog { page }),
            None if self.pages.is_exhausted() => tracing::info!("Request to page is finished"),
            None => {}
        }
        next
    }
}
