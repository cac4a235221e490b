use chrono::{DateTime, Utc};
use ethers::types::Address;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::time::{Duration, Instant};

use super::{HolderWithActivity, TokenAnalyzer};
use crate::error::AnalyzerError;
use crate::explorer::Explorer;
use crate::monitoring::{record_soft_failure, record_tx_lookup, SoftFailure};
use crate::utils::checksum;

impl TokenAnalyzer {
    /// `get_top(n)` with each holder's most recent transaction date.
    ///
    /// Date lookups run concurrently, at most `lookup_concurrency` at a time
    /// and each capped at `lookup_timeout`. A failed or slow lookup only
    /// blanks its own date; order and amounts are those of `get_top(n)`.
    pub async fn get_top_with_transactions(&self, n: usize) -> Vec<HolderWithActivity> {
        let holders = self.get_top(n).await;
        let explorer = self.explorer.as_ref();
        let limit = self.settings.lookup_timeout;

        let addresses: Vec<Address> = holders.iter().map(|h| h.address).collect();
        let dates: Vec<Option<DateTime<Utc>>> = stream::iter(addresses)
            .map(|address| last_transaction_or_none(explorer, address, limit))
            .buffered(self.settings.lookup_concurrency.max(1))
            .collect()
            .await;

        let result: Vec<HolderWithActivity> = holders
            .into_iter()
            .zip(dates)
            .map(|(holder, last_tx)| HolderWithActivity { holder, last_tx })
            .collect();
        info!("Sampled top {} holders with transaction dates", result.len());
        result
    }
}

async fn last_transaction_or_none(
    explorer: &dyn Explorer,
    address: Address,
    limit: Duration,
) -> Option<DateTime<Utc>> {
    let started = Instant::now();
    let outcome = match tokio::time::timeout(limit, explorer.last_transaction_at(address)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(AnalyzerError::Timeout(limit)),
    };
    record_tx_lookup(started.elapsed());

    match outcome {
        Ok(last_tx) => last_tx,
        Err(e) => {
            warn!("Could not get last transaction date for {}: {}", checksum(&address), e);
            record_soft_failure(SoftFailure::TxDate);
            None
        }
    }
}
