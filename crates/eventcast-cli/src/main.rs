//! EventCast CLI (eventctl)
//!
//! Demonstration tool that publishes schema-validated Avro events to an
//! event stream.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point eventctl at a settings file
//! eventctl --config eventcast.toml demo
//!
//! # Or configure everything through the environment
//! export EVENTCAST_CONNECTION_STRING="Endpoint=https://streams.example.com;EntityPath=orders"
//! export EVENTCAST_STREAM_NAME=orders
//! export EVENTCAST_REGISTRY_ENDPOINT=https://registry.example.com
//! export EVENTCAST_SCHEMA_GROUP=orders-group
//! eventctl demo
//! ```
//!
//! `demo` seeds the Order schema and runs all three publishing
//! workflows in order: a typed record, a dynamic record built from a
//! schema fetched by id, and a record whose schema is deliberately
//! unregistered. The workflows run to completion independently; a
//! caught per-workflow failure is reported and never aborts the
//! process.
//!
//! ## Configuration
//!
//! Settings come from the `[settings]` table of the config file, with
//! `EVENTCAST_*` environment variables overriding individual keys.
//! Credentials are ambient only: `EVENTCAST_AUTH_TOKEN` or the
//! `EVENTCAST_AUTH_USERNAME` / `EVENTCAST_AUTH_PASSWORD` pair.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use eventcast_client::EventPublisher;
use eventcast_schema::{AmbientCredential, EventSerializer, RestSchemaRegistry, SchemaRegistry};

mod config;
mod records;
mod workflows;

use config::Settings;

#[derive(Parser)]
#[command(name = "eventctl")]
#[command(about = "EventCast publishing demonstration tool", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        env = "EVENTCAST_CONFIG",
        default_value = "eventcast.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the Order schema and run all three publishing workflows
    Demo,
    /// Run a single publishing workflow
    Publish {
        #[command(subcommand)]
        workflow: PublishCommands,
    },
}

#[derive(Subcommand)]
enum PublishCommands {
    /// Publish a typed Order record
    Typed,
    /// Publish a dynamic record built against the configured target schema
    Dynamic,
    /// Attempt to publish a record with no registered schema
    Invalid,
}

/// Client handles shared by every workflow, constructed once at
/// startup.
struct Clients {
    registry: Arc<dyn SchemaRegistry>,
    serializer: EventSerializer,
    publisher: EventPublisher,
}

fn build_clients(settings: &Settings) -> Result<Clients> {
    let credential = AmbientCredential::from_env();
    let registry: Arc<dyn SchemaRegistry> = Arc::new(
        RestSchemaRegistry::new(&settings.registry_endpoint).with_credential(credential),
    );

    let serializer = EventSerializer::builder()
        .registry(Arc::clone(&registry))
        .group(&settings.schema_group)
        .build()
        .context("Failed to build the event serializer")?;

    let publisher = EventPublisher::builder()
        .connection_string(&settings.connection_string)
        .stream(&settings.stream_name)
        .build()
        .context("Failed to build the event publisher")?;

    Ok(Clients {
        registry,
        serializer,
        publisher,
    })
}

async fn run_demo(settings: &Settings, clients: &Clients) -> Result<()> {
    let seeded_id =
        workflows::seed_order_schema(clients.registry.as_ref(), &settings.schema_group).await?;
    let target_id = settings.target_schema_id.filter(|id| *id > 0).unwrap_or(seeded_id);

    let mut failures = 0;

    if let Err(e) = workflows::publish_typed_order(&clients.serializer, &clients.publisher).await {
        failures += 1;
        println!("❌ Typed publish failed: {:#}", e);
    }

    if let Err(e) = workflows::publish_dynamic_order(
        clients.registry.as_ref(),
        &clients.serializer,
        &clients.publisher,
        target_id,
    )
    .await
    {
        failures += 1;
        println!("❌ Dynamic publish failed: {:#}", e);
    }

    if let Err(e) = workflows::publish_unregistered_record(&clients.serializer).await {
        failures += 1;
        println!("❌ Unregistered-record workflow failed: {:#}", e);
    }

    if failures > 0 {
        println!("{} of 3 workflows failed", failures);
    } else {
        println!("All 3 workflows completed");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config).context("Failed to load settings")?;
    info!(
        config = %cli.config.display(),
        stream = %settings.stream_name,
        group = %settings.schema_group,
        "eventctl starting"
    );

    let clients = build_clients(&settings)?;

    match cli.command {
        Commands::Demo => run_demo(&settings, &clients).await,
        Commands::Publish { workflow } => match workflow {
            PublishCommands::Typed => {
                workflows::publish_typed_order(&clients.serializer, &clients.publisher).await
            }
            PublishCommands::Dynamic => {
                let schema_id = settings.target_schema_id.context(
                    "'target_schema_id' must be configured for the dynamic workflow",
                )?;
                workflows::publish_dynamic_order(
                    clients.registry.as_ref(),
                    &clients.serializer,
                    &clients.publisher,
                    schema_id,
                )
                .await
            }
            PublishCommands::Invalid => {
                workflows::publish_unregistered_record(&clients.serializer).await
            }
        },
    }
}
