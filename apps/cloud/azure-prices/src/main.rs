//! Azure Prices
//!
//! Queries the Azure Retail Prices API and prints matching price items as JSON.

use std::sync::Arc;
use std::time::Duration;

use azure_pricing_client::{
    PriceQuery, PricingClient, RequestContext, TracingLogger, build_filter, build_request_url,
};
use clap::{Args, Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::{Result, WrapErr};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "azure-prices")]
#[command(about = "Query the Azure Retail Prices API", version)]
struct Cli {
    /// Override the API endpoint (AZURE_PRICES_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the retry count (AZURE_PRICES_RETRY_MAX)
    #[arg(long, global = true)]
    retry_max: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every matching price item
    Fetch {
        #[command(flatten)]
        query: QueryArgs,

        /// Give up after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Print Prometheus metrics to stderr when done
        #[arg(long)]
        metrics: bool,
    },

    /// Print the OData filter and request URL without calling the API
    Filter {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Azure region, e.g. eastus
    #[arg(short, long)]
    region: Option<String>,

    /// ARM SKU name, e.g. Standard_B1s
    #[arg(short, long)]
    sku: Option<String>,

    /// Service name, e.g. "Virtual Machines"
    #[arg(long)]
    service: Option<String>,

    /// Product name
    #[arg(long)]
    product: Option<String>,

    /// Currency code, e.g. USD
    #[arg(short, long)]
    currency: Option<String>,
}

impl From<QueryArgs> for PriceQuery {
    fn from(args: QueryArgs) -> Self {
        PriceQuery {
            arm_region_name: args.region.unwrap_or_default(),
            arm_sku_name: args.sku.unwrap_or_default(),
            service_name: args.service.unwrap_or_default(),
            product_name: args.product.unwrap_or_default(),
            currency_code: args.currency.unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_tracing(&config.environment, &config.log_filter);

    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    if let Some(retry_max) = cli.retry_max {
        config.client.retry_max = retry_max;
    }

    match cli.command {
        Commands::Fetch {
            query,
            timeout,
            pretty,
            metrics,
        } => fetch(config, query.into(), timeout, pretty, metrics).await,

        Commands::Filter { query } => {
            let query: PriceQuery = query.into();
            println!("filter: {}", build_filter(&query));
            println!("url:    {}", build_request_url(&config.client.base_url, &query));
            Ok(())
        }
    }
}

async fn fetch(
    config: Config,
    query: PriceQuery,
    timeout: Option<u64>,
    pretty: bool,
    metrics: bool,
) -> Result<()> {
    let metrics_handle = if metrics {
        Some(observability::init_metrics().wrap_err("Failed to install metrics recorder")?)
    } else {
        None
    };

    let client_config = config
        .client
        .with_logger(Arc::new(TracingLogger::default()));
    let client = PricingClient::new(client_config).wrap_err("Invalid client configuration")?;

    let token = CancellationToken::new();
    let mut ctx = RequestContext::with_token(token.clone());
    if let Some(secs) = timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling query");
            interrupt.cancel();
        }
    });

    info!(query = %query.context(), "Fetching prices");
    let result = client.get_prices(&ctx, &query).await;
    token.cancel();
    client.close();

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    let items = result.wrap_err("Failed to fetch prices")?;
    info!(items = items.len(), "Fetched prices");

    let output = if pretty {
        serde_json::to_string_pretty(&items)?
    } else {
        serde_json::to_string(&items)?
    };
    println!("{}", output);

    Ok(())
}
