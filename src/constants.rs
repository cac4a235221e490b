use ethers::types::Address;
use std::str::FromStr;

/// Public Polygon RPC endpoints, tried in order.
pub const DEFAULT_RPC_URLS: &[&str] = &[
    "https://polygon-rpc.com",
    "https://rpc-mainnet.maticvigil.com",
    "https://poly-rpc.gateway.pokt.network",
];

pub const DEFAULT_TOKEN_ADDRESS: &str = "0x1a9b54a3075119f1546c52ca0940551a6ce5d2d0";

pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.polygonscan.com/api";

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Explorer page size for the Transfer log scan.
pub const TRANSFER_LOG_PAGE_SIZE: usize = 1000;

/// Upper bound of the `txlist` block window.
pub const TXLIST_END_BLOCK: u64 = 99_999_999;

pub const DEFAULT_TOP_N: i64 = 10;

pub const DEFAULT_TX_LOOKUP_CONCURRENCY: usize = 8;
pub const DEFAULT_TX_LOOKUP_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Holders probed when the Transfer log scan yields nothing.
/// The last entry is the default token contract itself.
pub const FALLBACK_HOLDERS: &[&str] = &[
    "0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d",
    "0x4830AF4aB9cd9E381602aE50f71AE481a7727f7C",
    "0x1a9b54a3075119f1546c52ca0940551a6ce5d2d0",
];

pub fn default_fallback_holders() -> Vec<Address> {
    FALLBACK_HOLDERS
        .iter()
        .filter_map(|s| Address::from_str(s).ok())
        .collect()
}

pub fn default_rpc_urls() -> Vec<String> {
    DEFAULT_RPC_URLS.iter().map(|s| s.to_string()).collect()
}
