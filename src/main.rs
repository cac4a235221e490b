use anyhow::{anyhow, Result};
use colored::Colorize;
use log::{info, warn};
use std::sync::Arc;

use token_analyzer::{
    analyzer::{SamplerSettings, TokenAnalyzer},
    api::{create_router, AppState},
    chain::{select_endpoint, ChainClient, EthersChainClient},
    config::AnalyzerConfig,
    explorer::EtherscanClient,
    monitoring::install_recorder,
    utils::setup_logger,
};

const DEMO_ADDRESS: &str = "0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d";
const DEMO_BATCH: [&str; 2] = [
    "0x51f1774249Fc2B0C2603542Ac6184Ae1d048351d",
    "0x4830AF4aB9cd9E381602aE50f71AE481a7727f7C",
];
const DEMO_TOP_N: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    dotenv::dotenv().ok();
    let config = AnalyzerConfig::from_env()?;
    setup_logger(&config.log_level)?;
    config.validate_all()?;

    let connection = select_endpoint(&config.rpc_urls, config.token_address, |url| {
        Ok(Arc::new(EthersChainClient::new(url)?) as Arc<dyn ChainClient>)
    })
    .await
    .map_err(|e| anyhow!("Startup failed: {}", e))?;
    info!(
        "Token {} ({} decimals) via {}",
        connection.token.symbol, connection.token.decimals, connection.rpc_url
    );

    let explorer = Arc::new(EtherscanClient::new(
        config.explorer_api_url.clone(),
        config.explorer_api_key.clone(),
    ));
    let analyzer = Arc::new(TokenAnalyzer::new(
        connection,
        explorer,
        SamplerSettings::from(&config),
    ));

    if std::env::args().any(|arg| arg == "--server") {
        serve(&config, analyzer).await
    } else {
        run_demo(&analyzer).await;
        Ok(())
    }
}

async fn serve(config: &AnalyzerConfig, analyzer: Arc<TokenAnalyzer>) -> Result<()> {
    let mut state = AppState::connected(analyzer);
    match install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Token analyzer listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

/// Runs every operation once against the configured token and prints the results.
async fn run_demo(analyzer: &TokenAnalyzer) {
    let symbol = analyzer.symbol();
    println!("{}", "Token Analyzer".bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "A: balance".cyan().bold());
    let (display, amount) = analyzer.get_balance(DEMO_ADDRESS).await;
    println!("{}: {} {} ({} smallest units)", DEMO_ADDRESS, display, symbol, amount);

    println!("\n{}", "B: batch balances".cyan().bold());
    let batch: Vec<String> = DEMO_BATCH.iter().map(|a| a.to_string()).collect();
    let balances = analyzer.get_balance_batch(&batch).await;
    for (address, balance) in batch.iter().zip(balances) {
        println!("{}: {} {}", address, balance, symbol);
    }

    println!("\n{}", format!("C: top {} holders (sampled)", DEMO_TOP_N).cyan().bold());
    for (i, holder) in analyzer.get_top(DEMO_TOP_N).await.iter().enumerate() {
        println!("{}. {}: {} {}", i + 1, holder.checksum_address(), holder.display, symbol);
    }

    println!("\n{}", "D: top holders with last transaction".cyan().bold());
    for (i, entry) in analyzer
        .get_top_with_transactions(DEMO_TOP_N)
        .await
        .iter()
        .enumerate()
    {
        let last_tx = entry.last_tx_formatted().unwrap_or_else(|| "n/a".to_string());
        println!(
            "{}. {}: {} {} (last tx: {})",
            i + 1,
            entry.holder.checksum_address(),
            entry.holder.display,
            symbol,
            last_tx
        );
    }

    println!("\n{}", "E: token info".cyan().bold());
    match analyzer.get_token_info(None).await {
        Some(info) => {
            println!("Name: {}", info.name);
            println!("Symbol: {}", info.symbol);
            println!("Decimals: {}", info.decimals);
            println!("Total supply: {} ({} smallest units)", info.total_supply, info.total_supply_wei);
        }
        None => println!("{}", "Token info unavailable".red()),
    }

    println!("\n{}", "Start the HTTP API with --server".dimmed());
}
