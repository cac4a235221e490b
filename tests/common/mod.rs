#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ethers::types::{Address, U256, U64};
use std::{collections::HashMap, sync::Arc, time::Duration};

use token_analyzer::{
    analyzer::{SamplerSettings, TokenAnalyzer},
    chain::{ChainClient, Connection, TokenContext},
    constants::TRANSFER_TOPIC,
    error::{AnalyzerError, AnalyzerResult},
    explorer::{Explorer, TransferLog},
};

pub fn token() -> Address {
    Address::repeat_byte(0xaa)
}

pub fn holder(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn tokens(whole: u64, tenths: u64) -> U256 {
    U256::from(whole * 10 + tenths) * U256::exp10(17)
}

pub fn transfer(from: Address, to: Address) -> TransferLog {
    let topic = |a: Address| format!("0x{}{}", "0".repeat(24), hex::encode(a.as_bytes()));
    TransferLog {
        topics: vec![TRANSFER_TOPIC.to_string(), topic(from), topic(to)],
        address: format!("{:?}", token()),
        data: "0x".to_string(),
        block_number: "0x1".to_string(),
        transaction_hash: String::new(),
    }
}

/// In-memory ERC20 with 18 decimals.
#[derive(Default)]
pub struct FakeChain {
    pub balances: HashMap<Address, U256>,
    pub dead: bool,
    pub panic_for: Option<Address>,
}

impl FakeChain {
    pub fn with_balances(balances: &[(Address, U256)]) -> Self {
        Self {
            balances: balances.iter().copied().collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn block_number(&self) -> AnalyzerResult<U64> {
        if self.dead {
            return Err(AnalyzerError::Rpc("connection refused".to_string()));
        }
        Ok(U64::from(42))
    }

    async fn decimals(&self, _token: Address) -> AnalyzerResult<u8> {
        Ok(18)
    }

    async fn symbol(&self, _token: Address) -> AnalyzerResult<String> {
        Ok("TKN".to_string())
    }

    async fn name(&self, token: Address) -> AnalyzerResult<String> {
        if token != self::token() {
            return Err(AnalyzerError::Rpc("execution reverted".to_string()));
        }
        Ok("Test Token".to_string())
    }

    async fn total_supply(&self, _token: Address) -> AnalyzerResult<U256> {
        Ok(U256::exp10(21))
    }

    async fn balance_of(&self, _token: Address, owner: Address) -> AnalyzerResult<U256> {
        if self.panic_for == Some(owner) {
            panic!("balance store corrupted");
        }
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }
}

/// Explorer backed by fixed logs and per-address activity.
#[derive(Default)]
pub struct FakeExplorer {
    /// `None` makes the log request fail.
    pub logs: Option<Vec<TransferLog>>,
    pub last_tx: HashMap<Address, i64>,
    pub failing: Vec<Address>,
    pub stalling: Vec<Address>,
}

#[async_trait]
impl Explorer for FakeExplorer {
    async fn transfer_logs(&self, _token: Address, _page_size: usize) -> AnalyzerResult<Vec<TransferLog>> {
        self.logs
            .clone()
            .ok_or_else(|| AnalyzerError::Explorer("NOTOK: Max rate limit reached".to_string()))
    }

    async fn last_transaction_at(&self, address: Address) -> AnalyzerResult<Option<DateTime<Utc>>> {
        if self.failing.contains(&address) {
            return Err(AnalyzerError::Explorer("NOTOK".to_string()));
        }
        if self.stalling.contains(&address) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self
            .last_tx
            .get(&address)
            .and_then(|secs| Utc.timestamp_opt(*secs, 0).single()))
    }
}

pub fn analyzer_with(chain: FakeChain, explorer: FakeExplorer, settings: SamplerSettings) -> Arc<TokenAnalyzer> {
    let connection = Connection {
        rpc_url: "http://fake-rpc".to_string(),
        client: Arc::new(chain),
        token: TokenContext {
            address: token(),
            decimals: 18,
            symbol: "TKN".to_string(),
        },
    };
    Arc::new(TokenAnalyzer::new(connection, Arc::new(explorer), settings))
}

pub fn analyzer(chain: FakeChain, explorer: FakeExplorer) -> Arc<TokenAnalyzer> {
    analyzer_with(
        chain,
        explorer,
        SamplerSettings {
            fallback_holders: vec![],
            lookup_timeout: Duration::from_millis(200),
            ..SamplerSettings::default()
        },
    )
}
