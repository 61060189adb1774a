//! PiratePay CLI
//!
//! Operator tool for the PiratePay gateway: initiate a PirateChain (ARRR)
//! payment for an order, or walk an order through the full checkout hooks.

mod config;

use clap::{Args, Parser, Subcommand};
use config::ConfigLoader;
use piratepay_core::config::METHOD_ID;
use piratepay_core::entities::{MemoryOrderBook, OrderSnapshot, OrderStatus};
use piratepay_core::presentation::{Channel, Format, render_payment};
use piratepay_core::processors::{CheckoutGateway, EmailAudience};
use piratepay_sdk::PaymentIntentClient;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// PiratePay - accept PirateChain (ARRR) payments for storefront orders
#[derive(Parser, Debug)]
#[command(name = "piratepay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "./piratepay-config.toml")]
    config: PathBuf,

    /// Override the PiratePay API URL from the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print results as JSON instead of rendered text
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a payment address for one order
    Initiate {
        #[command(flatten)]
        order: OrderArgs,
    },
    /// Place an order, then render the thank-you page and the order email
    Checkout {
        #[command(flatten)]
        order: OrderArgs,

        /// Base URL of the storefront, used for the thank-you redirect
        #[arg(long, default_value = "http://localhost/")]
        store_url: Url,

        /// Render the order email as plain text
        #[arg(long, default_value = "false")]
        plain_text: bool,
    },
}

#[derive(Args, Debug)]
struct OrderArgs {
    /// Storefront order id
    #[arg(long)]
    order_id: String,

    /// Order total in the store currency
    #[arg(long)]
    amount: Decimal,

    /// Store currency code (e.g. USD)
    #[arg(long)]
    currency: String,

    #[arg(long, default_value = "")]
    buyer_name: String,

    #[arg(long, default_value = "")]
    buyer_email: String,
}

impl OrderArgs {
    fn into_snapshot(self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.order_id,
            currency: self.currency,
            total: self.amount,
            billing_first_name: self.buyer_name,
            billing_email: self.buyer_email,
            payment_method: METHOD_ID.to_string(),
            status: OrderStatus::Pending,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    tracing::debug!("Starting piratepay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&cli.config, cli.api_url.clone());
    let loaded = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", cli.config);

    let client = PaymentIntentClient::new();

    match cli.command {
        Command::Initiate { order } => {
            let request = order.into_snapshot().payment_request().map_err(|e| {
                tracing::error!("Invalid order: {}", e);
                e
            })?;

            let result = client.request_payment(&loaded.gateway, &request).await;
            let success = result.is_success();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let rendered = render_payment(&result, Channel::ThankYouPage, Format::Html);
                println!("{}", rendered.body);
            }

            Ok(exit_code(success))
        }
        Command::Checkout {
            order,
            store_url,
            plain_text,
        } => {
            let order = order.into_snapshot();
            let order_id = order.id.clone();

            let book = MemoryOrderBook::new(store_url);
            book.insert(order.clone()).await;

            let gateway =
                CheckoutGateway::new(Arc::new(client), loaded.gateway, loaded.settings, book);

            let processed = gateway.process_payment(&order).await.map_err(|e| {
                tracing::error!(order_id = %order_id, "Checkout failed: {}", e);
                e
            })?;

            let placed = gateway
                .lifecycle()
                .get(&order_id)
                .await
                .ok_or_else(|| anyhow::anyhow!("order {order_id} vanished from the order book"))?;

            let page = gateway.on_order_ready_for_payment(&placed).await;
            let email = gateway
                .on_order_payment_retry_requested(
                    &placed,
                    EmailAudience {
                        sent_to_admin: false,
                        plain_text,
                    },
                )
                .await;
            let success = !page.is_error;

            if cli.json {
                let report = serde_json::json!({
                    "order_id": order_id,
                    "status": placed.status,
                    "redirect": processed.redirect,
                    "thank_you_page": page,
                    "email": email,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Order {order_id} is {} ({})", placed.status, processed.redirect);
                println!();
                println!("== Thank-you page ==");
                println!("{}", page.body);
                if let Some(email) = email {
                    println!();
                    println!("== Order email ==");
                    println!("{}", email.body);
                }
            }

            Ok(exit_code(success))
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper_util=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
