use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_DOWNLOAD_DELAY_MS, DEFAULT_OUTPUT_FILE,
    DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, MAX_DOWNLOAD_DELAY_MS,
};
use crate::core::ConfigProvider;
use crate::domain::model::Credentials;
use crate::utils::error::{CrawlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub concurrent_requests: Option<usize>,
    pub download_delay_ms: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            file: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CrawlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CrawlError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMAIL})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CrawlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.site.base_url
    }

    fn user_agent(&self) -> &str {
        self.site.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            email: validation::validate_required_field("credentials.email", &self.credentials.email)?
                .to_string(),
            password: validation::validate_required_field(
                "credentials.password",
                &self.credentials.password,
            )?
            .to_string(),
        })
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        self.output.file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn concurrent_requests(&self) -> usize {
        self.crawl
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn download_delay(&self) -> Duration {
        Duration::from_millis(self.crawl.download_delay_ms.unwrap_or(DEFAULT_DOWNLOAD_DELAY_MS))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.crawl
                .request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("site.base_url", &self.site.base_url)?;
        validation::validate_non_empty_string("site.user_agent", self.user_agent())?;
        self.credentials()?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_extension("output.file", self.output_file(), &["csv"])?;
        validation::validate_positive_number(
            "crawl.concurrent_requests",
            self.concurrent_requests(),
            1,
        )?;
        validation::validate_range(
            "crawl.download_delay_ms",
            self.download_delay().as_millis() as u64,
            0,
            MAX_DOWNLOAD_DELAY_MS,
        )?;
        validation::validate_positive_number(
            "crawl.request_timeout_seconds",
            self.request_timeout().as_secs() as usize,
            1,
        )?;
        Ok(())
    }
}
