use anyhow::Result;
use clap::Parser;
use futureself_server::app::App;
use futureself_server::models::Config;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "futureself-server")]
#[command(about = "Serve dream letters, suggestions, and validity checks")]
struct CliArgs {
    /// Address to bind; overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on; overrides PORT.
    #[arg(long, value_parser = parse_port_arg)]
    port: Option<u16>,
}

fn parse_port_arg(input: &str) -> std::result::Result<u16, String> {
    input
        .parse()
        .map_err(|_| format!("Invalid port '{}'. Expected a number from 0 to 65535", input))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "futureself_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting futureself-server");

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    match App::new(&config) {
        Ok(app) => match app.run().await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Server failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
