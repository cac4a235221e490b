//! The token analyzer: every read operation the service exposes, built on one
//! selected RPC connection and one block-explorer client.
//!
//! Lookups fail soft. The public operations log the error and hand back a
//! zero balance, an absent date or no metadata, so a caller cannot tell
//! "nothing there" from "could not ask". The `try_*` variants keep the typed
//! error for internal callers that need the difference.

use ethers::types::{Address, U256};
use log::{error, info};
use std::{sync::Arc, time::Duration};

use crate::chain::{ChainClient, Connection, TokenContext};
use crate::config::AnalyzerConfig;
use crate::constants::{
    default_fallback_holders, DEFAULT_TX_LOOKUP_CONCURRENCY, DEFAULT_TX_LOOKUP_TIMEOUT_SECS,
    TRANSFER_LOG_PAGE_SIZE,
};
use crate::error::AnalyzerResult;
use crate::explorer::Explorer;
use crate::monitoring::{record_soft_failure, SoftFailure};
use crate::utils::{checksum, parse_address, to_display_amount};

pub mod activity;
pub mod holders;
pub mod types;

pub use holders::{extract_participants, rank_holders};
pub use types::{Balance, Holder, HolderWithActivity, TokenMetadata};

#[derive(Debug, Clone)]
pub struct SamplerSettings {
    /// Transfer logs requested from the explorer per sample.
    pub page_size: usize,
    /// Probed when the log scan produces no holders.
    pub fallback_holders: Vec<Address>,
    /// Max transaction-date lookups in flight.
    pub lookup_concurrency: usize,
    pub lookup_timeout: Duration,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            page_size: TRANSFER_LOG_PAGE_SIZE,
            fallback_holders: default_fallback_holders(),
            lookup_concurrency: DEFAULT_TX_LOOKUP_CONCURRENCY,
            lookup_timeout: Duration::from_secs(DEFAULT_TX_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl From<&AnalyzerConfig> for SamplerSettings {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            page_size: config.transfer_log_page_size,
            fallback_holders: config.fallback_holders.clone(),
            lookup_concurrency: config.tx_lookup_concurrency,
            lookup_timeout: config.tx_lookup_timeout(),
        }
    }
}

/// Built once at startup and shared read-only across requests.
pub struct TokenAnalyzer {
    connection: Connection,
    explorer: Arc<dyn Explorer>,
    settings: SamplerSettings,
}

impl TokenAnalyzer {
    pub fn new(connection: Connection, explorer: Arc<dyn Explorer>, settings: SamplerSettings) -> Self {
        Self {
            connection,
            explorer,
            settings,
        }
    }

    pub fn token(&self) -> &TokenContext {
        &self.connection.token
    }

    pub fn symbol(&self) -> &str {
        &self.connection.token.symbol
    }

    pub fn rpc_url(&self) -> &str {
        &self.connection.rpc_url
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    fn chain(&self) -> &dyn ChainClient {
        self.connection.client.as_ref()
    }

    /// Live probe of the selected endpoint.
    pub async fn is_connected(&self) -> bool {
        self.chain().block_number().await.is_ok()
    }

    pub async fn try_balance(&self, address: &str) -> AnalyzerResult<Balance> {
        let owner = parse_address(address)?;
        self.try_balance_of(owner).await
    }

    async fn try_balance_of(&self, owner: Address) -> AnalyzerResult<Balance> {
        let token = &self.connection.token;
        let amount = self.chain().balance_of(token.address, owner).await?;
        Ok(Balance {
            address: owner,
            amount,
            display: to_display_amount(amount, token.decimals),
        })
    }

    /// Balance of `address` as `(display, smallest_unit)`; `(0.0, 0)` on any failure.
    pub async fn get_balance(&self, address: &str) -> (f64, U256) {
        match self.try_balance(address).await {
            Ok(balance) => {
                info!("Balance {}: {} {}", balance.checksum_address(), balance.display, self.symbol());
                (balance.display, balance.amount)
            }
            Err(e) => {
                error!("Could not get balance for {}: {}", address, e);
                record_soft_failure(SoftFailure::Balance);
                (0.0, U256::zero())
            }
        }
    }

    pub(crate) async fn balance_or_zero(&self, owner: Address) -> Balance {
        match self.try_balance_of(owner).await {
            Ok(balance) => balance,
            Err(e) => {
                error!("Could not get balance for {}: {}", checksum(&owner), e);
                record_soft_failure(SoftFailure::Balance);
                Balance::zero(owner)
            }
        }
    }

    /// Display balances for `addresses`, one call per address, in input order.
    pub async fn get_balance_batch(&self, addresses: &[String]) -> Vec<f64> {
        let mut balances = Vec::with_capacity(addresses.len());
        for address in addresses {
            let (display, _) = self.get_balance(address).await;
            balances.push(display);
        }
        info!("Fetched balances for {} addresses", addresses.len());
        balances
    }

    pub async fn try_token_info(&self, address: Option<&str>) -> AnalyzerResult<TokenMetadata> {
        let token = match address {
            Some(raw) => parse_address(raw)?,
            None => self.connection.token.address,
        };
        let chain = self.chain();

        let symbol = chain.symbol(token).await?;
        let name = chain.name(token).await?;
        let decimals = chain.decimals(token).await?;
        let total_supply_wei = chain.total_supply(token).await?;

        Ok(TokenMetadata {
            address: token,
            symbol,
            name,
            decimals,
            total_supply: to_display_amount(total_supply_wei, decimals),
            total_supply_wei,
        })
    }

    /// Metadata for `address`, or the configured token when `None`.
    pub async fn get_token_info(&self, address: Option<&str>) -> Option<TokenMetadata> {
        match self.try_token_info(address).await {
            Ok(info) => {
                info!("Token info {}: {:?}", info.symbol, info);
                Some(info)
            }
            Err(e) => {
                let target = address
                    .map(str::to_string)
                    .unwrap_or_else(|| checksum(&self.connection.token.address));
                error!("Could not get token info for {}: {}", target, e);
                record_soft_failure(SoftFailure::TokenInfo);
                None
            }
        }
    }
}
