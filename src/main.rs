//! ATAIX ladder bot entry point.

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ataix_ladder::config::Config;
use ataix_ladder::exchange::{AtaixClient, Exchange};
use ataix_ladder::runner::LadderRunner;
use ataix_ladder::strategy::PairSelector;

/// Discounted limit-buy ladder for ATAIX USDT pairs.
#[derive(Parser, Debug)]
#[command(name = "ataix-ladder")]
#[command(about = "Places a ladder of discounted limit buys on the first cheap ATAIX USDT pair")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the ladder once (default).
    Run {
        /// Plan the ladder but submit nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Check the configured asset balance.
    CheckBalance,

    /// List pairs and whether each is eligible.
    ListPairs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("ataix_ladder=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::CheckBalance) => cmd_check_balance().await,
        Some(Command::ListPairs) => cmd_list_pairs().await,
        Some(Command::Run { dry_run }) => cmd_run(dry_run).await,
        None => cmd_run(false).await,
    }
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

/// Run the ladder once.
///
/// An aborted run is logged and still exits successfully.
async fn cmd_run(dry_run: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = AtaixClient::new(&config)?;
    let runner = LadderRunner::new(client, &config).with_dry_run(config.dry_run || dry_run);

    match runner.run().await {
        Ok(report) if report.dry_run => {
            println!("Dry run: {} on {}", report.plan.symbol, report.plan.bid);
            for (i, order) in report.plan.orders().iter().enumerate() {
                println!(
                    "  Order {}: buy {} @ {} (notional {})",
                    i + 1,
                    order.quantity,
                    order.price,
                    order.notional().round_dp(6)
                );
            }
        }
        Ok(report) => {
            info!(
                accepted = report.accepted.len(),
                rejected = report.rejected.len(),
                saved = report.saved_to.is_some(),
                "Ladder finished"
            );
        }
        Err(abort) => {
            error!(stage = %abort.stage, error = %abort.source, "Run aborted");
        }
    }

    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ATAIX LADDER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Base URL: {}", config.base_url());
    println!("  Balance Asset: {}", config.balance_asset);
    println!("  Quote Asset: {}", config.quote_asset);
    println!("  Max Bid: {}", config.max_bid_price);
    let discounts: Vec<String> = config
        .ladder_discounts
        .iter()
        .map(|d| format!("-{}%", d * rust_decimal::Decimal::ONE_HUNDRED))
        .collect();
    println!("  Ladder: {}", discounts.join(", "));
    println!("  Price Decimals: {}", config.price_decimals);
    println!("  HTTP Timeout: {}s", config.http_timeout_secs);
    println!("  Orders File: {}", config.orders_file.display());
    println!("  Dry Run: {}", config.dry_run);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check the configured asset balance.
async fn cmd_check_balance() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = AtaixClient::new(&config)?;

    println!("Host: {}", client.base_url());
    print!("Getting {} balance... ", config.balance_asset);
    std::io::stdout().flush()?;
    match client.available_balance(&config.balance_asset).await {
        Ok(balance) => {
            println!("OK");
            println!("  Available: {:.6} {}", balance, config.balance_asset);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
        }
    }

    Ok(())
}

/// List pairs and whether each is eligible.
async fn cmd_list_pairs() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = AtaixClient::new(&config)?;
    let selector = PairSelector::from_config(&config);

    let pairs = client.list_pairs().await?;
    let selected = selector.select(&pairs).map(|p| p.symbol.clone());

    println!("{:<16} {:<8} {:>16}  ", "SYMBOL", "QUOTE", "BID");
    for pair in &pairs {
        let bid = pair
            .bid
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if selected.as_deref() == Some(pair.symbol.as_str()) {
            "<- selected"
        } else if selector.is_eligible(pair) {
            "eligible"
        } else {
            ""
        };
        println!("{:<16} {:<8} {:>16}  {}", pair.symbol, pair.quote, bid, marker);
    }

    match selected {
        Some(symbol) => println!("\n{} pairs, selected {}", pairs.len(), symbol),
        None => println!("\n{} pairs, none eligible", pairs.len()),
    }

    Ok(())
}
