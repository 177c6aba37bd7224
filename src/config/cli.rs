use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_DOWNLOAD_DELAY_MS, DEFAULT_OUTPUT_FILE,
    DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, MAX_DOWNLOAD_DELAY_MS,
};
use crate::core::ConfigProvider;
use crate::domain::model::Credentials;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "mobikom-crawler")]
#[command(about = "Crawls the mobikom.biz catalog into a CSV file")]
pub struct CliConfig {
    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "EMAIL", hide_env_values = true)]
    pub email: Option<String>,

    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS)]
    pub concurrent_requests: usize,

    #[arg(long, default_value_t = DEFAULT_DOWNLOAD_DELAY_MS)]
    pub download_delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    pub request_timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            email: validation::validate_required_field("email", &self.email)?.to_string(),
            password: validation::validate_required_field("password", &self.password)?.to_string(),
        })
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        self.credentials()?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("output_file", &self.output_file, &["csv"])?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validation::validate_range("download_delay_ms", self.download_delay_ms, 0, MAX_DOWNLOAD_DELAY_MS)?;
        validation::validate_positive_number(
            "request_timeout_seconds",
            self.request_timeout_seconds as usize,
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["mobikom-crawler"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_and_credentials() {
        let config = parse(&["--email", "user@example.com", "--password", "secret"]);

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.output_file(), "product_data.csv");
        assert_eq!(config.concurrent_requests(), 16);
        assert_eq!(config.download_delay(), Duration::from_millis(10));
        assert!(config.validate().is_ok());

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.email, "user@example.com");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = parse(&["--email", "user@example.com", "--password", "secret"]);
        config.concurrent_requests = 0;
        assert!(config.validate().is_err());

        let mut config = parse(&["--email", "user@example.com", "--password", "secret"]);
        config.password = None;
        assert!(config.validate().is_err());

        let config = parse(&[
            "--email",
            "user@example.com",
            "--password",
            "secret",
            "--output-file",
            "products.json",
        ]);
        assert!(config.validate().is_err());
    }
}
