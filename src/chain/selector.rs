use ethers::types::Address;
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

use super::ChainClient;
use crate::error::{AnalyzerError, AnalyzerResult};

/// Token facts resolved once at startup and never refreshed.
#[derive(Debug, Clone, Serialize)]
pub struct TokenContext {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

/// The endpoint that won selection, together with the token it was checked against.
#[derive(Clone)]
pub struct Connection {
    pub rpc_url: String,
    pub client: Arc<dyn ChainClient>,
    pub token: TokenContext,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("rpc_url", &self.rpc_url)
            .field("token", &self.token)
            .finish()
    }
}

/// Walks `rpc_urls` once, in order, and returns the first endpoint that is
/// live and answers `decimals` and `symbol` for `token`.
///
/// There is no retry and no later re-validation: a selected endpoint that
/// dies afterwards shows up as per-request lookup failures.
pub async fn select_endpoint<F>(
    rpc_urls: &[String],
    token: Address,
    connect: F,
) -> AnalyzerResult<Connection>
where
    F: Fn(&str) -> AnalyzerResult<Arc<dyn ChainClient>>,
{
    for rpc_url in rpc_urls {
        let client = match connect(rpc_url) {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not build client for {}: {}", rpc_url, e);
                continue;
            }
        };

        match client.block_number().await {
            Ok(block) => info!("Connected via {} at block {}", rpc_url, block),
            Err(e) => {
                warn!("Could not connect to {}: {}", rpc_url, e);
                continue;
            }
        }

        let decimals = match client.decimals(token).await {
            Ok(decimals) => decimals,
            Err(e) => {
                warn!("Token metadata unavailable via {}: {}", rpc_url, e);
                continue;
            }
        };
        let symbol = match client.symbol(token).await {
            Ok(symbol) => symbol,
            Err(e) => {
                warn!("Token metadata unavailable via {}: {}", rpc_url, e);
                continue;
            }
        };

        info!("Token: {}, decimals: {}", symbol, decimals);
        return Ok(Connection {
            rpc_url: rpc_url.clone(),
            client,
            token: TokenContext {
                address: token,
                decimals,
                symbol,
            },
        });
    }

    Err(AnalyzerError::NoEndpoint {
        tried: rpc_urls.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChainClient;
    use ethers::types::U64;

    fn live_client(decimals: u8, symbol: &'static str) -> MockChainClient {
        let mut client = MockChainClient::new();
        client.expect_block_number().returning(|| Ok(U64::from(100)));
        client.expect_decimals().returning(move |_| Ok(decimals));
        client.expect_symbol().returning(move |_| Ok(symbol.to_string()));
        client
    }

    fn dead_client() -> MockChainClient {
        let mut client = MockChainClient::new();
        client
            .expect_block_number()
            .returning(|| Err(AnalyzerError::Rpc("connection refused".to_string())));
        client.expect_decimals().never();
        client
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_first_usable_endpoint_wins() {
        let rpc_urls = urls(&["http://dead", "http://live", "http://also-live"]);
        let connection = select_endpoint(&rpc_urls, Address::random(), |url| {
            let client: Arc<dyn ChainClient> = match url {
                "http://dead" => Arc::new(dead_client()),
                "http://live" => Arc::new(live_client(18, "LIVE")),
                _ => Arc::new(live_client(6, "OTHER")),
            };
            Ok(client)
        })
        .await
        .unwrap();

        assert_eq!(connection.rpc_url, "http://live");
        assert_eq!(connection.token.decimals, 18);
        assert_eq!(connection.token.symbol, "LIVE");
    }

    #[tokio::test]
    async fn test_skips_endpoint_without_token_metadata() {
        let rpc_urls = urls(&["http://no-token", "http://good"]);
        let connection = select_endpoint(&rpc_urls, Address::random(), |url| {
            let client: Arc<dyn ChainClient> = if url == "http://no-token" {
                let mut client = MockChainClient::new();
                client.expect_block_number().returning(|| Ok(U64::from(1)));
                client.expect_decimals().returning(|_| Ok(18));
                client
                    .expect_symbol()
                    .returning(|_| Err(AnalyzerError::Rpc("execution reverted".to_string())));
                Arc::new(client)
            } else {
                Arc::new(live_client(8, "GOOD"))
            };
            Ok(client)
        })
        .await
        .unwrap();

        assert_eq!(connection.rpc_url, "http://good");
        assert_eq!(connection.token.decimals, 8);
    }

    #[tokio::test]
    async fn test_all_endpoints_failing_is_fatal() {
        let rpc_urls = urls(&["not a url", "http://dead"]);
        let result = select_endpoint(&rpc_urls, Address::random(), |url| {
            if url == "not a url" {
                return Err(AnalyzerError::Rpc("bad url".to_string()));
            }
            let client: Arc<dyn ChainClient> = Arc::new(dead_client());
            Ok(client)
        })
        .await;

        assert!(matches!(result, Err(AnalyzerError::NoEndpoint { tried: 2 })));
    }
}
