use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ethers::types::Address;
use serde::Deserialize;
use serde_json::Value;

use crate::constants::{TRANSFER_TOPIC, TXLIST_END_BLOCK};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::utils::checksum;

/// Messages an Etherscan-style API uses for an empty, but successful, result.
const EMPTY_RESULT_MESSAGES: &[&str] = &["No records found", "No transactions found"];

/// Block-explorer lookups used for holder discovery and activity dates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Explorer: Send + Sync {
    /// One page of Transfer logs emitted by `token`, oldest first.
    async fn transfer_logs(&self, token: Address, page_size: usize) -> AnalyzerResult<Vec<TransferLog>>;

    /// Timestamp of the most recent transaction sent from or to `address`.
    async fn last_transaction_at(&self, address: Address) -> AnalyzerResult<Option<DateTime<Utc>>>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLog {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub block_number: String,
    #[serde(default)]
    pub transaction_hash: String,
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountTransaction {
    time_stamp: String,
}

/// Etherscan-compatible HTTP client (PolygonScan by default).
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn query(&self, params: &[(&str, String)]) -> AnalyzerResult<ExplorerResponse> {
        let mut request = self.http.get(&self.base_url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AnalyzerError::Explorer(format!(
                "HTTP {} from {}",
                response.status(),
                self.base_url
            )));
        }
        Ok(response.json::<ExplorerResponse>().await?)
    }
}

#[async_trait]
impl Explorer for EtherscanClient {
    async fn transfer_logs(&self, token: Address, page_size: usize) -> AnalyzerResult<Vec<TransferLog>> {
        let params = [
            ("module", "logs".to_string()),
            ("action", "getLogs".to_string()),
            ("address", checksum(&token)),
            ("topic0", TRANSFER_TOPIC.to_string()),
            ("fromBlock", "earliest".to_string()),
            ("toBlock", "latest".to_string()),
            ("page", "1".to_string()),
            ("offset", page_size.to_string()),
        ];
        let response = self.query(&params).await?;
        let mut logs = parse_list::<TransferLog>(response)?;
        logs.truncate(page_size);
        Ok(logs)
    }

    async fn last_transaction_at(&self, address: Address) -> AnalyzerResult<Option<DateTime<Utc>>> {
        let params = [
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", checksum(&address)),
            ("startblock", "0".to_string()),
            ("endblock", TXLIST_END_BLOCK.to_string()),
            ("page", "1".to_string()),
            ("offset", "1".to_string()),
            ("sort", "desc".to_string()),
        ];
        let response = self.query(&params).await?;
        let transactions = parse_list::<AccountTransaction>(response)?;
        match transactions.first() {
            Some(tx) => parse_unix_timestamp(&tx.time_stamp).map(Some),
            None => Ok(None),
        }
    }
}

fn parse_list<T: serde::de::DeserializeOwned>(response: ExplorerResponse) -> AnalyzerResult<Vec<T>> {
    if response.status != "1" {
        if EMPTY_RESULT_MESSAGES.contains(&response.message.as_str()) {
            return Ok(Vec::new());
        }
        // On failure `result` usually carries the human readable reason.
        let detail = response.result.as_str().unwrap_or_default();
        return Err(AnalyzerError::Explorer(format!(
            "{} {}",
            response.message, detail
        ).trim().to_string()));
    }
    serde_json::from_value(response.result)
        .map_err(|e| AnalyzerError::Explorer(format!("unexpected result shape: {}", e)))
}

fn parse_unix_timestamp(raw: &str) -> AnalyzerResult<DateTime<Utc>> {
    let seconds: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AnalyzerError::Explorer(format!("bad timeStamp {:?}", raw)))?;
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| AnalyzerError::Explorer(format!("timeStamp out of range: {}", seconds)))
}
