use anyhow::Result;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

// Metrics for monitoring
const METRIC_SOFT_FAILURES: &str = "token_analyzer_soft_failures_total";
const METRIC_HOLDER_CANDIDATES: &str = "token_analyzer_holder_candidates";
const METRIC_FALLBACK_SAMPLES: &str = "token_analyzer_fallback_samples_total";
const METRIC_TX_LOOKUP_TIME: &str = "token_analyzer_tx_lookup_seconds";

/// Which lookup degraded to a sentinel value.
#[derive(Debug, Clone, Copy)]
pub enum SoftFailure {
    Balance,
    TransferLogs,
    TxDate,
    TokenInfo,
}

impl SoftFailure {
    fn label(self) -> &'static str {
        match self {
            SoftFailure::Balance => "balance",
            SoftFailure::TransferLogs => "transfer_logs",
            SoftFailure::TxDate => "tx_date",
            SoftFailure::TokenInfo => "token_info",
        }
    }
}

/// Installs the global Prometheus recorder. Without it every macro below is a no-op.
pub fn install_recorder() -> Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

pub fn record_soft_failure(kind: SoftFailure) {
    counter!(METRIC_SOFT_FAILURES, 1, "kind" => kind.label());
}

pub fn record_holder_candidates(count: usize) {
    histogram!(METRIC_HOLDER_CANDIDATES, count as f64);
}

pub fn record_fallback_sample() {
    counter!(METRIC_FALLBACK_SAMPLES, 1);
}

pub fn record_tx_lookup(elapsed: Duration) {
    histogram!(METRIC_TX_LOOKUP_TIME, elapsed.as_secs_f64());
}
