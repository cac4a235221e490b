use thiserror::Error;

/// Failures of a single chain or explorer lookup.
///
/// The public analyzer operations swallow these into zero / absent values;
/// they only surface through the `try_*` variants and in logs.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("explorer error: {0}")]
    Explorer(String),
    #[error("lookup timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("no usable rpc endpoint among {tried} candidates")]
    NoEndpoint { tried: usize },
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::Explorer(err.to_string())
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
