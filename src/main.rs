//! Solblink - Solana DeFi market browser and Blink action runner.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_sdk::commitment_config::CommitmentConfig;
use tracing_subscriber::{fmt, EnvFilter};

use solblink::adapters::blink::{BlinkAction, BlinkClient};
use solblink::adapters::cli::{
    CliApp, Command, HealthCmd, InspectCmd, MarketsCmd, PositionsCmd, RunCmd, SimulateCmd,
};
use solblink::adapters::markets::MarketsClient;
use solblink::adapters::solana::{resolve_endpoints, RpcPool, WalletManager};
use solblink::application::BlinkExecutor;
use solblink::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in config files)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Markets(cmd) => markets_command(cmd).await,
        Command::Positions(cmd) => positions_command(cmd).await,
        Command::Inspect(cmd) => inspect_command(cmd).await,
        Command::Simulate(cmd) => simulate_command(cmd).await,
        Command::Run(cmd) => run_command(cmd).await,
        Command::Health(cmd) => health_command(cmd).await,
    }
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

/// One pool per invocation; endpoint resolution order is env list, env
/// single, config list, config single, built-in default.
fn build_pool(config: &Config) -> RpcPool {
    RpcPool::new(resolve_endpoints(
        config.solana.rpc_urls_source(),
        config.solana.rpc_url_source(),
    ))
    .with_commitment(parse_commitment(&config.solana.commitment))
}

fn parse_commitment(level: &str) -> CommitmentConfig {
    match level {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

fn load_wallet(config: &Config, override_path: Option<&Path>) -> Result<WalletManager> {
    let path = override_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| config.solana.get_keypair_path());
    // Expand keypair path (handles ~ for home directory)
    let path = shellexpand::tilde(&path).to_string();

    if !Path::new(&path).exists() {
        bail!(
            "Wallet file not found: {}\n\n\
             To create a new wallet, run:\n  \
             solana-keygen new --outfile {}\n\n\
             Or point --keypair (or keypair_path in your config) at an existing wallet",
            path,
            path
        );
    }

    WalletManager::from_file(&path)
        .with_context(|| format!("Failed to load wallet from '{}'", path))
}

async fn markets_command(cmd: MarketsCmd) -> Result<()> {
    let config = Config::load_or_default(&cmd.config)?;
    let client = MarketsClient::new(
        config.aggregator.api_url.clone(),
        config.aggregator.get_api_key(),
    )?;

    let markets = client
        .list_markets(cmd.protocol.as_deref())
        .await
        .context("Failed to list markets")?;

    println!("{} market(s)", markets.len());
    for market in &markets {
        let tvl = market
            .tvl_usd
            .map(|v| format!("${:.0}", v))
            .unwrap_or_else(|| "-".to_string());
        let apy = market
            .apy_pct
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {} ({})  TVL {}  APY {}",
            market.protocol, market.name, market.id, tvl, apy
        );
    }
    Ok(())
}

async fn positions_command(cmd: PositionsCmd) -> Result<()> {
    let config = Config::load_or_default(&cmd.config)?;
    let client = MarketsClient::new(
        config.aggregator.api_url.clone(),
        config.aggregator.get_api_key(),
    )?;

    let positions = client
        .positions(&cmd.wallet)
        .await
        .context("Failed to fetch positions")?;

    if positions.is_empty() {
        println!("No positions for {}", cmd.wallet);
        return Ok(());
    }

    println!("{} position(s) for {}", positions.len(), cmd.wallet);
    for position in &positions {
        let value = position
            .value_usd
            .map(|v| format!("${:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {}  {} {}  {}",
            position.protocol,
            position.market_id,
            position.amount,
            position.token.as_deref().unwrap_or("?"),
            value
        );
    }
    Ok(())
}

async fn inspect_command(cmd: InspectCmd) -> Result<()> {
    let action = BlinkAction::parse(&cmd.url).context("Invalid blink reference")?;
    let client = BlinkClient::new()?;

    let actions = client
        .inspect(&action)
        .await
        .context("Failed to inspect blink")?;

    println!("{} action(s) at {}", actions.len(), action.url);
    for entry in &actions {
        println!("  {} -> {}", entry.label, entry.href);
        for param in &entry.parameters {
            let required = if param.required { " (required)" } else { "" };
            println!("    param: {}{}", param.name, required);
        }
    }
    Ok(())
}

async fn simulate_command(cmd: SimulateCmd) -> Result<()> {
    let config = Config::load_or_default(&cmd.config)?;
    let account = match cmd.account {
        Some(account) => account,
        None => load_wallet(&config, cmd.keypair.as_deref())?.public_key(),
    };

    let action = BlinkAction::parse(&cmd.url)
        .context("Invalid blink reference")?
        .with_params(cmd.params);
    let client = BlinkClient::new()?;
    let artifact = client
        .build(&action.url, &account, &action.params)
        .await
        .context("Failed to build transaction")?;
    if let Some(message) = &artifact.message {
        println!("Server: {}", message);
    }

    let pool = build_pool(&config);
    let executor = BlinkExecutor::new(pool.shared(None));
    let outcome = executor
        .simulate(&artifact)
        .await
        .context("Simulation transport failed")?;

    println!(
        "Simulation: {}",
        if outcome.success { "OK" } else { "FAILED" }
    );
    if let Some(units) = outcome.units_consumed {
        println!("Compute units: {}", units);
    }
    if let Some(error) = &outcome.error {
        println!("Error: {}", error);
    }
    for log in &outcome.logs {
        println!("  {}", log);
    }
    Ok(())
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    let config = Config::load_or_default(&cmd.config)?;
    let wallet = load_wallet(&config, cmd.keypair.as_deref())?;

    let action = BlinkAction::parse(&cmd.url)
        .context("Invalid blink reference")?
        .with_params(cmd.params);
    let client = BlinkClient::new()?;
    let artifact = client
        .build(&action.url, &wallet.public_key(), &action.params)
        .await
        .context("Failed to build transaction")?;
    if let Some(message) = &artifact.message {
        println!("Server: {}", message);
    }

    let pool = build_pool(&config);
    let executor = BlinkExecutor::new(pool.shared(None));

    if cmd.simulate_first {
        let outcome = executor
            .simulate(&artifact)
            .await
            .context("Simulation transport failed")?;
        if !outcome.success {
            for log in &outcome.logs {
                println!("  {}", log);
            }
            bail!(
                "Simulation failed, not sending: {}",
                outcome.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        println!("Simulation OK");
    }

    if !cmd.yes {
        print!(
            "Send transaction as {}? Type 'SEND' to confirm: ",
            wallet.public_key()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "SEND" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let signature = executor
        .sign_and_send(&artifact, &wallet)
        .await
        .context("Execution failed")?;

    println!("Confirmed: {}", signature);
    println!("Explorer: https://solscan.io/tx/{}", signature);
    Ok(())
}

async fn health_command(cmd: HealthCmd) -> Result<()> {
    let config = Config::load_or_default(&cmd.config)?;
    let pool = build_pool(&config);

    println!("Checking {} endpoint(s)...", pool.endpoints().len());
    for report in pool.check_all().await {
        let latency = report
            .latency_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());
        if report.healthy {
            println!(
                "  OK      {}  slot={}  v{}  {}",
                report.url,
                report.slot.unwrap_or_default(),
                report.version.unwrap_or_default(),
                latency
            );
        } else {
            println!(
                "  FAILED  {}  {}  ({})",
                report.url,
                report.error.unwrap_or_else(|| "unknown error".to_string()),
                latency
            );
        }
    }
    Ok(())
}
