//! Developer CLI for poking at the storefront backend and the local
//! persisted state: inspect the location hierarchy, render an order's
//! progress pipeline, look at what the delivery store holds.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crumb_api::{HierarchyCache, LocationsClient, OrdersClient, Session};
use crumb_core::timeline::{current_stage, is_stage_complete, STAGE_PIPELINE};
use crumb_core::DeliveryDetails;
use crumb_store::{keys, FileBackend, PersistedStore};

#[derive(Debug, Parser)]
#[command(name = "crumb-cli")]
#[command(about = "crumb storefront developer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and print the country → state → city hierarchy.
    Locations,
    /// Render the status pipeline for an order.
    Status { order_id: Uuid },
    /// Print the persisted delivery details, if any.
    Delivery,
    /// Clear the persisted delivery details.
    ResetDelivery,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = crumb_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Locations => {
            let cache = HierarchyCache::new(LocationsClient::from_config(&config)?);
            let hierarchy = cache.load().await?;
            for country in hierarchy.countries() {
                println!("{country}");
                for state in hierarchy.states_of(country) {
                    let cities = hierarchy.cities_of(country, state);
                    println!("  {state}: {}", cities.join(", "));
                }
            }
        }
        Commands::Status { order_id } => {
            let client = OrdersClient::from_config(&config)?;
            let session = Session::from_config(&config);
            let events = client.order_timeline(&session, order_id).await?;
            match current_stage(&events) {
                Some(current) => {
                    for stage in STAGE_PIPELINE {
                        let mark = if is_stage_complete(stage, current) {
                            'x'
                        } else {
                            ' '
                        };
                        println!("[{mark}] {stage}");
                    }
                }
                None => println!("no known stage reached yet"),
            }
            for event in &events {
                println!("{}  {}", event.timestamp_label(), event.action);
            }
        }
        Commands::Delivery => {
            let backend = FileBackend::new(config.storage_dir.clone())?;
            let store: PersistedStore<DeliveryDetails, _> =
                PersistedStore::open(keys::DELIVERY, backend);
            match store.get() {
                Some(details) => println!(
                    "{} — {}, {}, {} ({})",
                    details.address, details.city, details.state, details.country, details.date
                ),
                None => println!("no delivery details stored"),
            }
        }
        Commands::ResetDelivery => {
            let backend = FileBackend::new(config.storage_dir.clone())?;
            let mut store: PersistedStore<DeliveryDetails, _> =
                PersistedStore::open(keys::DELIVERY, backend);
            store.reset()?;
            println!("delivery details cleared");
        }
    }

    Ok(())
}
