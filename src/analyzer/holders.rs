//! Holder sampling.
//!
//! The "top holders" here are a sample, not a ranking of the real top
//! holders. Candidates come only from one explorer page of Transfer logs, so
//! accounts that never appear in that page are invisible no matter how much
//! they hold. An exhaustive answer needs a full-history index, which this
//! service is not.

use ethers::types::Address;
use itertools::Itertools;
use log::{debug, info, warn};

use super::{Holder, TokenAnalyzer};
use crate::explorer::TransferLog;
use crate::monitoring::{
    record_fallback_sample, record_holder_candidates, record_soft_failure, SoftFailure,
};
use crate::utils::topic_to_address;

impl TokenAnalyzer {
    /// Up to `n` holders from the sampled candidates, highest balance first.
    ///
    /// Candidates are truncated to `n` *before* their balances are known,
    /// so a large holder can be dropped in favour of a small one. Falls back
    /// to the configured example addresses when the scan yields nothing.
    pub async fn get_top(&self, n: usize) -> Vec<Holder> {
        if n == 0 {
            return Vec::new();
        }

        let mut holders = Vec::new();
        let token = self.connection.token.address;
        match self.explorer.transfer_logs(token, self.settings.page_size).await {
            Ok(logs) => {
                let candidates = extract_participants(&logs);
                debug!("{} transfer logs, {} unique participants", logs.len(), candidates.len());
                record_holder_candidates(candidates.len());
                holders = self.resolve_nonzero(candidates.into_iter().take(n)).await;
            }
            Err(e) => {
                warn!("Could not fetch transfer logs: {}", e);
                record_soft_failure(SoftFailure::TransferLogs);
            }
        }

        if holders.is_empty() {
            info!("Transfer log scan found no holders, using fallback addresses");
            record_fallback_sample();
            let fallback = self.settings.fallback_holders.iter().copied().unique().collect_vec();
            holders = self.resolve_nonzero(fallback).await;
        }

        let top = rank_holders(holders, n);
        info!("Sampled top {} holders", top.len());
        top
    }

    /// Sequential balance lookups; zero and failed balances are dropped.
    async fn resolve_nonzero(&self, owners: impl IntoIterator<Item = Address> + Send) -> Vec<Holder> {
        let mut holders = Vec::new();
        for owner in owners {
            let balance = self.balance_or_zero(owner).await;
            if !balance.amount.is_zero() {
                holders.push(balance);
            }
        }
        holders
    }
}

/// Unique, non-zero `from`/`to` addresses of Transfer logs, in first-seen order.
/// Logs with fewer than three topics are not ERC20 Transfers and are skipped.
pub fn extract_participants(logs: &[TransferLog]) -> Vec<Address> {
    logs.iter()
        .filter(|log| log.topics.len() >= 3)
        .flat_map(|log| [&log.topics[1], &log.topics[2]])
        .filter_map(|topic| topic_to_address(topic))
        .filter(|address| !address.is_zero())
        .unique()
        .collect()
}

/// Sorts by amount, descending, and keeps the first `n`.
pub fn rank_holders(mut holders: Vec<Holder>, n: usize) -> Vec<Holder> {
    holders.sort_by(|a, b| b.amount.cmp(&a.amount));
    holders.truncate(n);
    holders
}
