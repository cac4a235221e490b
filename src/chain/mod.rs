use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, U256, U64},
};
use std::sync::Arc;

use crate::abi::Erc20;
use crate::error::{AnalyzerError, AnalyzerResult};

pub mod selector;

pub use selector::{select_endpoint, Connection, TokenContext};

/// Read-only view of an EVM JSON-RPC endpoint, limited to what the analyzer
/// needs from an ERC20 contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Liveness probe.
    async fn block_number(&self) -> AnalyzerResult<U64>;
    async fn decimals(&self, token: Address) -> AnalyzerResult<u8>;
    async fn symbol(&self, token: Address) -> AnalyzerResult<String>;
    async fn name(&self, token: Address) -> AnalyzerResult<String>;
    async fn total_supply(&self, token: Address) -> AnalyzerResult<U256>;
    async fn balance_of(&self, token: Address, owner: Address) -> AnalyzerResult<U256>;
}

pub struct EthersChainClient {
    provider: Arc<Provider<Http>>,
}

impl EthersChainClient {
    pub fn new(rpc_url: &str) -> AnalyzerResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AnalyzerError::Rpc(format!("{}: {}", rpc_url, e)))?;
        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    fn erc20(&self, token: Address) -> Erc20<Provider<Http>> {
        Erc20::new(token, self.provider.clone())
    }
}

fn rpc_err(e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Rpc(e.to_string())
}

#[async_trait]
impl ChainClient for EthersChainClient {
    async fn block_number(&self) -> AnalyzerResult<U64> {
        self.provider.get_block_number().await.map_err(rpc_err)
    }

    async fn decimals(&self, token: Address) -> AnalyzerResult<u8> {
        self.erc20(token).decimals().call().await.map_err(rpc_err)
    }

    async fn symbol(&self, token: Address) -> AnalyzerResult<String> {
        self.erc20(token).symbol().call().await.map_err(rpc_err)
    }

    async fn name(&self, token: Address) -> AnalyzerResult<String> {
        self.erc20(token).name().call().await.map_err(rpc_err)
    }

    async fn total_supply(&self, token: Address) -> AnalyzerResult<U256> {
        self.erc20(token).total_supply().call().await.map_err(rpc_err)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> AnalyzerResult<U256> {
        self.erc20(token).balance_of(owner).call().await.map_err(rpc_err)
    }
}
