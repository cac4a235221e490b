use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Serialize, Serializer};

use crate::utils::{checksum, format_timestamp};

/// A token balance in both smallest-unit and display form.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub address: Address,
    pub amount: U256,
    pub display: f64,
}

impl Balance {
    pub fn zero(address: Address) -> Self {
        Self {
            address,
            amount: U256::zero(),
            display: 0.0,
        }
    }

    pub fn checksum_address(&self) -> String {
        checksum(&self.address)
    }
}

/// One entry of a holder sample. Samples are ordered by `amount`, descending.
pub type Holder = Balance;

#[derive(Debug, Clone, PartialEq)]
pub struct HolderWithActivity {
    pub holder: Holder,
    /// `None` when the lookup failed, timed out, or found no transactions.
    pub last_tx: Option<DateTime<Utc>>,
}

impl HolderWithActivity {
    pub fn last_tx_formatted(&self) -> Option<String> {
        self.last_tx.as_ref().map(format_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenMetadata {
    #[serde(serialize_with = "serialize_checksum")]
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "totalSupply")]
    pub total_supply: f64,
    #[serde(rename = "totalSupplyWei", serialize_with = "serialize_decimal")]
    pub total_supply_wei: U256,
}

fn serialize_checksum<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&checksum(address))
}

// U256 routinely exceeds what a JSON number can carry.
fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
