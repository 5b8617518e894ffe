//! Uniswap V2 Trading Route CLI
//!
//! Usage:
//!   uniswap_v2_route [--config PATH] [--env NAME] config
//!   uniswap_v2_route quote --from ETH --to DAI --amount 1.5
//!   ROUTE_PRIVATE_KEY=0x... uniswap_v2_route trade --from MKR --to ETH --amount 2
//!
//! Assets are given as symbols (ETH, WETH, DAI, MKR) or `0x` addresses.
//! Amounts are human-readable and scaled by `--decimals`. For `trade` the
//! signing account acts as both the caller and the route.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::parse_units;
use route_adapter::{UniswapV2Provider, UniswapV2TradingRoute};
use route_config::blockchain::tokens;
use route_config::{load_settings, parse_amount, RouteConfig, RouteSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use types::{TradeOptions, TradeRequest};

/// Environment variable holding the signing key for `trade`
const PRIVATE_KEY_VAR: &str = "ROUTE_PRIVATE_KEY";

#[derive(Parser, Debug)]
#[command(name = "uniswap_v2_route", version, about = "Uniswap V2 trading route")]
struct Args {
    /// Settings file (defaults to config/route.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Environment overlay under <config dir>/environments/
    #[arg(long)]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved route configuration
    Config,

    /// Expected output from the live router
    Quote {
        #[command(flatten)]
        pair: PairArgs,
    },

    /// Execute a trade through the live router
    Trade {
        #[command(flatten)]
        pair: PairArgs,

        /// Minimum acceptable output, in base units
        #[arg(long)]
        amount_out_min: Option<String>,

        /// Deadline timestamp
        #[arg(long)]
        deadline: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct PairArgs {
    /// Source asset
    #[arg(long)]
    from: String,

    /// Destination asset
    #[arg(long)]
    to: String,

    /// Source amount, human-readable
    #[arg(long)]
    amount: String,

    /// Decimals of the source asset
    #[arg(long, default_value_t = 18)]
    decimals: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref(), args.env.as_deref())
        .context("Failed to load route settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.global.log_level.clone().into()),
        )
        .init();

    let config = settings.route_config()?;
    info!("📋 Route config: router {:?}", config.router);

    match args.command {
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Command::Quote { pair } => {
            let (src, dest, amount) = pair.resolve(&config)?;
            let provider = Arc::new(connect(&settings)?);
            let chain = Arc::new(UniswapV2Provider::new(provider, config.router, Address::zero()));
            let route = UniswapV2TradingRoute::new(config, Address::zero(), chain);

            let amount_out = route.quote(src, dest, amount).await?;
            println!("{}", amount_out);
        }
        Command::Trade {
            pair,
            amount_out_min,
            deadline,
        } => {
            let (src, dest, amount) = pair.resolve(&config)?;
            let options = TradeOptions {
                amount_out_min: amount_out_min.as_deref().map(parse_amount).transpose()?,
                deadline: deadline.as_deref().map(parse_amount).transpose()?,
            };

            let provider = connect(&settings)?;
            let chain_id = match settings.network.chain_id {
                Some(id) => id,
                None => provider
                    .get_chainid()
                    .await
                    .context("Failed to query chain id")?
                    .as_u64(),
            };
            let key = std::env::var(PRIVATE_KEY_VAR)
                .with_context(|| format!("{} is not set", PRIVATE_KEY_VAR))?;
            let wallet = key
                .trim()
                .parse::<LocalWallet>()
                .context("Invalid private key")?
                .with_chain_id(chain_id);
            let account = wallet.address();
            info!("🔑 Trading as {:?} on chain {}", account, chain_id);

            let client = Arc::new(SignerMiddleware::new(provider, wallet));
            let chain = Arc::new(UniswapV2Provider::new(client, config.router, account));
            let route = UniswapV2TradingRoute::new(config, account, chain);
            let mut events = route.subscribe();

            let request = if src == route.native_sentinel() {
                TradeRequest::native(src, dest, amount)
            } else {
                TradeRequest::token(src, dest, amount)
            };
            route.trade_with_options(account, request, options).await?;

            let event = events.recv().await.context("Trade event not received")?;
            println!("{}", serde_json::to_string_pretty(&event)?);

            let log = dex::encode_trade_log(&event);
            for topic in &log.topics {
                println!("topic: {:?}", topic);
            }
            println!("data: {}", Bytes::from(log.data));
        }
    }

    Ok(())
}

impl PairArgs {
    fn resolve(&self, config: &RouteConfig) -> Result<(Address, Address, U256)> {
        let src = resolve_asset(&self.from, config)?;
        let dest = resolve_asset(&self.to, config)?;
        let amount: U256 = parse_units(self.amount.trim(), self.decimals)
            .with_context(|| format!("Invalid amount {:?}", self.amount))?
            .into();
        Ok((src, dest, amount))
    }
}

fn resolve_asset(raw: &str, config: &RouteConfig) -> Result<Address> {
    let asset = match raw.trim().to_ascii_uppercase().as_str() {
        "ETH" => config.native_sentinel,
        "WETH" => config.wrapped_native,
        "DAI" => tokens::DAI,
        "MKR" => tokens::MKR,
        _ => raw
            .trim()
            .parse::<Address>()
            .with_context(|| format!("Unknown asset {:?}", raw))?,
    };
    Ok(asset)
}

fn connect(settings: &RouteSettings) -> Result<Provider<Http>> {
    let Some(url) = settings.network.rpc_url.as_deref() else {
        bail!("network.rpc_url is not configured (set ROUTE_NETWORK__RPC_URL)");
    };
    Provider::<Http>::try_from(url).with_context(|| format!("Invalid RPC URL {:?}", url))
}
