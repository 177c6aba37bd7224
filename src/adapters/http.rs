use crate::domain::ports::ConfigProvider;
use crate::domain::model::{FetchMethod, FetchRequest};
use crate::domain::ports::Fetcher;
use crate::utils::error::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Semaphore;

/// reqwest-backed fetcher.
///
/// Session requests share one cookie jar, so the login carries over to the
/// profile and catalog pages. Isolated requests go through a client with no
/// cookie store at all.
pub struct HttpFetcher {
    session: Client,
    isolated: Client,
    limiter: Semaphore,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let session = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()?;
        let isolated = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            session,
            isolated,
            limiter: Semaphore::new(config.concurrent_requests()),
            delay: config.download_delay(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| CrawlError::SchedulerError {
                message: format!("request limiter closed: {}", e),
            })?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let client = if request.isolated {
            &self.isolated
        } else {
            &self.session
        };
        let builder = match &request.method {
            FetchMethod::Get => client.get(request.url.clone()),
            FetchMethod::PostForm(fields) => client.post(request.url.clone()).form(fields),
        };

        tracing::debug!("Fetching {} (isolated: {})", request.fingerprint(), request.isolated);
        let response = builder.send().await?.error_for_status()?;
        tracing::debug!("Response {} from {}", response.status(), request.url);

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Credentials;
    use httpmock::prelude::*;

    struct TestConfig {
        base_url: String,
    }

    impl ConfigProvider for TestConfig {
        fn base_url(&self) -> &str {
            &self.base_url
        }
        fn user_agent(&self) -> &str {
            "mobikom-crawler-test"
        }
        fn credentials(&self) -> Result<Credentials> {
            Ok(Credentials::default())
        }
        fn output_path(&self) -> &str {
            "test_output"
        }
        fn output_file(&self) -> &str {
            "product_data.csv"
        }
        fn concurrent_requests(&self) -> usize {
            2
        }
        fn download_delay(&self) -> Duration {
            Duration::ZERO
        }
        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    #[tokio::test]
    async fn test_fetch_get_and_form_post() {
        let server = MockServer::start_async().await;
        let page_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/catalog").header("user-agent", "mobikom-crawler-test");
                then.status(200).body("<html>catalog</html>");
            })
            .await;
        let login_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/account/logindata")
                    .body_includes("userEmail=user%40example.com");
                then.status(200).body("{}");
            })
            .await;

        let fetcher = HttpFetcher::new(&TestConfig {
            base_url: server.base_url(),
        })
        .unwrap();

        let url = url::Url::parse(&server.url("/catalog")).unwrap();
        let body = fetcher.fetch(&FetchRequest::get(url)).await.unwrap();
        assert_eq!(body, "<html>catalog</html>");

        let url = url::Url::parse(&server.url("/account/logindata")).unwrap();
        let form = vec![("userEmail".to_string(), "user@example.com".to_string())];
        fetcher.fetch(&FetchRequest::post_form(url, form)).await.unwrap();

        page_mock.assert_async().await;
        login_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let fetcher = HttpFetcher::new(&TestConfig {
            base_url: server.base_url(),
        })
        .unwrap();
        let url = url::Url::parse(&server.url("/missing")).unwrap();

        let err = fetcher.fetch(&FetchRequest::get(url).isolated()).await.unwrap_err();
        assert!(matches!(err, CrawlError::HttpError(_)));
    }
}
