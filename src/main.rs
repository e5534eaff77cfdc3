use crate::app_config::AppConfig;
use crate::domain::PublishRequest;
use crate::extractor::Extractor;
use crate::extractor::client::new_client;
use crate::publisher::{MockLocationPublisher, PublishError};
use crate::status_listener::status_listener;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{error, info, warn};

mod app_config;
mod domain;
mod extractor;
mod publisher;
mod status_listener;

#[derive(Parser)]
#[command(author, version, about = "Publishes a mock GPS location taken from a map link or coordinate text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a coordinate from a map URL, a short link or "<lat>,<lon>[,<alt>]" text
    Extract { input: String },

    /// Publish a mock location until interrupted
    Run {
        /// Map URL, short link or coordinate text, takes precedence over the coordinate options
        input: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        altitude: Option<String>,

        /// Refresh interval in milliseconds
        #[arg(long)]
        refresh_ms: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    let cli = Cli::parse();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let extractor = Extractor::new(new_client(&config)?, &config);

    match cli.command {
        Commands::Extract { input } => {
            let coordinate = extractor.spawn(input).await??;
            println!("{}", coordinate);
        }
        Commands::Run {
            input,
            latitude,
            longitude,
            altitude,
            refresh_ms,
        } => {
            let default_interval = config.publisher().refresh_interval();
            let request = match input {
                Some(input) => {
                    let coordinate = extractor.spawn(input).await??;
                    PublishRequest::from_coordinate(&coordinate, refresh_ms.as_deref(), default_interval)
                }
                None => PublishRequest::from_fields(
                    latitude.as_deref(),
                    longitude.as_deref(),
                    altitude.as_deref(),
                    refresh_ms.as_deref(),
                    default_interval,
                ),
            };
            run(request, &config).await?;
        }
    }

    Ok(())
}

async fn run(request: PublishRequest, config: &AppConfig) -> Result<(), PublishError> {
    let publisher = MockLocationPublisher::new(publisher::new_provider(config), config);

    let status_rx = publisher.status();
    task::spawn(async move {
        status_listener(status_rx).await;
    });
    info!("✅  Initialized status listener");

    let (error_tx, mut error_rx) = mpsc::unbounded_channel::<PublishError>();
    publisher.add_listener(Arc::new(error_tx));

    publisher.start(request).await;
    info!("🔥 {} is up and running, press Ctrl-C to stop", env!("CARGO_PKG_NAME"));

    let result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("⚠️ Unable to listen for Ctrl-C: {}", e);
            }
            Ok(())
        }
        Some(error) = error_rx.recv() => {
            error!("❌ {}", error);
            warn!("⚠️ Select {} as the mock location app in Developer Options and start again", env!("CARGO_PKG_NAME"));
            Err(error)
        }
    };

    publisher.stop().await;
    result
}
