pub mod abi;
pub mod analyzer;
pub mod api;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod explorer;
pub mod monitoring;  // Prometheus recorder and metric helpers
pub mod utils;
