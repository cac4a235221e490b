use anyhow::{anyhow, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use validator::{Validate, ValidationError};

use crate::constants::{
    default_fallback_holders, default_rpc_urls, DEFAULT_EXPLORER_API_URL, DEFAULT_HTTP_HOST,
    DEFAULT_HTTP_PORT, DEFAULT_TOKEN_ADDRESS, DEFAULT_TX_LOOKUP_CONCURRENCY,
    DEFAULT_TX_LOOKUP_TIMEOUT_SECS, TRANSFER_LOG_PAGE_SIZE,
};
use crate::utils::parse_address;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzerConfig {
    // Network configuration
    #[validate(length(min = 1), custom = "validate_rpc_urls")]
    pub rpc_urls: Vec<String>,
    #[validate(custom = "validate_address")]
    pub token_address: Address,

    // Block explorer
    #[validate(custom = "validate_http_url")]
    pub explorer_api_url: String,
    pub explorer_api_key: Option<String>,

    // HTTP server
    pub http_host: String,
    #[validate(range(min = 1))]
    pub http_port: u16,
    pub log_level: String,

    // Holder sampling
    // Etherscan-style getLogs returns at most 1000 entries per page.
    #[validate(range(min = 1, max = 1000))]
    pub transfer_log_page_size: usize,
    pub fallback_holders: Vec<Address>,

    // Transaction-date fan-out
    #[validate(range(min = 1, max = 256))]
    pub tx_lookup_concurrency: usize,
    #[validate(range(min = 1, max = 300))]
    pub tx_lookup_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            rpc_urls: default_rpc_urls(),
            token_address: parse_address(DEFAULT_TOKEN_ADDRESS).unwrap_or_else(|_| Address::zero()),
            explorer_api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            explorer_api_key: None,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            log_level: "info".to_string(),
            transfer_log_page_size: TRANSFER_LOG_PAGE_SIZE,
            fallback_holders: default_fallback_holders(),
            tx_lookup_concurrency: DEFAULT_TX_LOOKUP_CONCURRENCY,
            tx_lookup_timeout_secs: DEFAULT_TX_LOOKUP_TIMEOUT_SECS,
        }
    }
}

impl AnalyzerConfig {
    /// Builds the config from process environment, falling back to defaults
    /// for anything unset. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rpc_urls = match env::var("RPC_URLS") {
            Ok(raw) => split_list(&raw),
            Err(_) => defaults.rpc_urls,
        };
        let token_address = match env::var("TOKEN_ADDRESS") {
            Ok(raw) => parse_address(&raw).map_err(|e| anyhow!("TOKEN_ADDRESS: {}", e))?,
            Err(_) => defaults.token_address,
        };
        let fallback_holders = match env::var("FALLBACK_HOLDERS") {
            Ok(raw) => split_list(&raw)
                .iter()
                .map(|s| parse_address(s))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow!("FALLBACK_HOLDERS: {}", e))?,
            Err(_) => defaults.fallback_holders,
        };

        Ok(Self {
            rpc_urls,
            token_address,
            explorer_api_url: env::var("EXPLORER_API_URL").unwrap_or(defaults.explorer_api_url),
            explorer_api_key: env::var("EXPLORER_API_KEY").ok().filter(|k| !k.is_empty()),
            http_host: env::var("HTTP_HOST").unwrap_or(defaults.http_host),
            http_port: parse_env("HTTP_PORT", defaults.http_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            transfer_log_page_size: parse_env(
                "TRANSFER_LOG_PAGE_SIZE",
                defaults.transfer_log_page_size,
            )?,
            fallback_holders,
            tx_lookup_concurrency: parse_env(
                "TX_LOOKUP_CONCURRENCY",
                defaults.tx_lookup_concurrency,
            )?,
            tx_lookup_timeout_secs: parse_env(
                "TX_LOOKUP_TIMEOUT_SECS",
                defaults.tx_lookup_timeout_secs,
            )?,
        })
    }

    pub fn validate_all(&self) -> Result<()> {
        if let Err(e) = self.validate() {
            return Err(anyhow!("Configuration validation failed: {:?}", e));
        }
        self.validate_bind_address()?;
        Ok(())
    }

    fn validate_bind_address(&self) -> Result<()> {
        self.bind_address()
            .parse::<std::net::SocketAddr>()
            .map(|_| ())
            .map_err(|e| anyhow!("Invalid HTTP bind address {}: {}", self.bind_address(), e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn tx_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_lookup_timeout_secs)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

// Custom validators
fn validate_http_url(raw: &str) -> Result<(), ValidationError> {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new("invalid_http_url")),
    }
}

fn validate_rpc_urls(urls: &[String]) -> Result<(), ValidationError> {
    urls.iter().try_for_each(|u| validate_http_url(u))
}

fn validate_address(address: &Address) -> Result<(), ValidationError> {
    if address == &Address::zero() {
        return Err(ValidationError::new("zero_address"));
    }
    Ok(())
}
