use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use stoplight_client::app::{App, GPX_FORM, SIMULATE_FORM};
use stoplight_client::config::{load_config, load_default_config, validate};
use stoplight_client::observability::logging::init_logging;
use stoplight_client::routing::NavigationTarget;
use stoplight_client::views::{GpxFormView, SimulateFormView};

#[derive(Parser)]
#[command(name = "stoplight-client")]
#[command(about = "Client for the stoplight route backend", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base address, overrides the configuration.
    #[arg(short, long)]
    base_address: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,
    /// Navigate through one or more paths and report the mounted views
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Upload a GPX track and print the stoplight groups on it
    SubmitRoute {
        #[arg(long)]
        gpx: PathBuf,
    },
    /// Print the stoplight groups stored in the backend session
    Stoplights,
    /// Send a simulation request and print the reply
    Simulate {
        /// JSON form payload.
        #[arg(long, default_value = "{}")]
        payload: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    if let Some(base) = cli.base_address {
        config.api.base_address = base;
        validate(&config)?;
    }

    init_logging(&config.observability)?;
    tracing::info!("stoplight-client v{} starting", env!("CARGO_PKG_VERSION"));

    if let Commands::Config = cli.command {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let app = App::new(config)?;

    match cli.command {
        Commands::Routes => {
            for route in app.router().routes() {
                let loading = if route.lazy { "lazy" } else { "eager" };
                let path = if route.fallback { "(fallback)" } else { route.path.as_str() };
                println!("{:<16} {:<16} {}", path, route.name, loading);
            }
        }
        Commands::Navigate { paths } => {
            for path in paths {
                match app.navigate(path.as_str()).await {
                    Ok(active) => println!(
                        "{} -> {} ({})",
                        app.router().href(&active.location),
                        active.name,
                        active.view_name()
                    ),
                    Err(e) => eprintln!("{}: {}", path, e),
                }
            }
        }
        Commands::SubmitRoute { gpx } => {
            let xml = tokio::fs::read_to_string(&gpx).await?;
            app.navigate(NavigationTarget::named(GPX_FORM)).await?;
            let groups = GpxFormView.submit_gpx(app.context(), &xml).await?;
            print_json(&groups)?;
        }
        Commands::Stoplights => {
            let groups = app.context().api.fetch_stoplight_groups().await?;
            print_json(&groups)?;
        }
        Commands::Simulate { payload } => {
            let form: Value = serde_json::from_str(&payload)?;
            app.navigate(NavigationTarget::named(SIMULATE_FORM)).await?;
            let reply = SimulateFormView.run(app.context(), form).await?;
            print_json(&reply)?;
        }
        Commands::Config => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
