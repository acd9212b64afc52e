//! Client configuration.
//!
//! Both clients are configured from environment variables. Defaults point
//! at the public repository contents API and the production data
//! repository; tests construct the structs directly against mock servers.

use url::Url;
use zeroize::Zeroizing;

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_REPO: &str = "MGFPKU/MGF_dataset_scraping";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the source file lives and how to authenticate.
///
/// Custom `Debug` implementation redacts the token.
#[derive(Clone)]
pub struct SourceConfig {
    /// Base URL of the contents API.
    pub api_url: Url,
    /// `owner/name` of the data repository.
    pub repo: String,
    /// Path of the CSV file inside the repository.
    pub path: String,
    pub branch: String,
    /// Bearer credential. Public repositories work without one.
    pub token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_url", &self.api_url)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SourceConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `POLMON_GITHUB_API_URL` (default: `https://api.github.com`)
    /// - `POLMON_REPO` (default: `MGFPKU/MGF_dataset_scraping`)
    /// - `POLMON_DATA_PATH` (default: `default_path`, chosen by language)
    /// - `POLMON_BRANCH` (default: `main`)
    /// - `GITHUB_TOKEN` (optional)
    /// - `POLMON_TIMEOUT_SECS` (default: 30)
    pub fn from_env(default_path: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env_url("POLMON_GITHUB_API_URL", DEFAULT_API_URL)?,
            repo: env_or("POLMON_REPO", DEFAULT_REPO),
            path: env_or("POLMON_DATA_PATH", default_path),
            branch: env_or("POLMON_BRANCH", DEFAULT_BRANCH),
            token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(Zeroizing::new),
            timeout_secs: env_timeout()?,
        })
    }

    /// `{api_url}/repos/{repo}/contents/{path}?ref={branch}`.
    pub fn contents_url(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}/repos/{}/contents/{}",
            self.api_url.as_str().trim_end_matches('/'),
            self.repo.trim_matches('/'),
            self.path.trim_start_matches('/'),
        );
        let mut url =
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl("contents".into(), e.to_string()))?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }
}

/// Mail relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RelayConfig {
    /// Load from `GOOGLE_SCRIPT_URL` and `POLMON_TIMEOUT_SECS`.
    ///
    /// Returns `Ok(None)` when no endpoint is configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(raw) = std::env::var("GOOGLE_SCRIPT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
        else {
            return Ok(None);
        };
        let endpoint = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidUrl("GOOGLE_SCRIPT_URL".into(), e.to_string()))?;
        Ok(Some(Self {
            endpoint,
            timeout_secs: env_timeout()?,
        }))
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = env_or(var, default);
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_timeout() -> Result<u64, ConfigError> {
    match std::env::var("POLMON_TIMEOUT_SECS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber("POLMON_TIMEOUT_SECS".into(), raw)),
        Err(_) => Ok(DEFAULT_TIMEOUT_SECS),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
    #[error("invalid bearer token")]
    InvalidToken,
}
