//! injectorctl - command-line access to the injector API

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use injector_client::{InjectorClient, DEFAULT_INJECTOR_URL};
use injector_types::{is_reserved_field, ServiceRecord};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "injectorctl")]
#[command(about = "Resolve and register services in the injector", long_about = None)]
#[command(version)]
struct Cli {
    /// Injector base URL
    #[arg(long, env = "INJECTOR_URL", default_value = DEFAULT_INJECTOR_URL)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a service id and print its record
    Resolve {
        /// Service id
        id: String,
    },
    /// Register a new service
    Register {
        /// Service id
        id: String,

        /// Human-readable name
        #[arg(long)]
        name: String,

        /// Address the service is reachable at
        #[arg(long)]
        address: String,

        /// Extra field stored with the record, as KEY=VALUE (repeatable)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Check liveness and store readiness
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = InjectorClient::new(&cli.url)?;

    match cli.command {
        Commands::Resolve { id } => {
            let (record, elapsed) = client.resolve_timed(&id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            eprintln!("resolved in {:.3} ms", elapsed.as_secs_f64() * 1000.0);
        }
        Commands::Register {
            id,
            name,
            address,
            fields,
        } => {
            let mut record = ServiceRecord::new(id, name, address);
            for field in &fields {
                let (key, value) = parse_field(field)?;
                record = record.with_field(key, value);
            }
            client.register(&record).await?;
            println!("registered {}", record.id);
        }
        Commands::Health => {
            client.health().await.context("injector is not live")?;
            if client.ready().await? {
                println!("healthy");
            } else {
                println!("degraded: store unreachable");
            }
        }
    }

    Ok(())
}

fn parse_field(field: &str) -> anyhow::Result<(String, Value)> {
    let Some((key, value)) = field.split_once('=') else {
        bail!("field must be KEY=VALUE, got {:?}", field);
    };
    if key.is_empty() {
        bail!("field key must not be empty");
    }
    if is_reserved_field(key) {
        bail!("{} is set by its own flag, not --field", key);
    }
    Ok((key.to_string(), Value::String(value.to_string())))
}
