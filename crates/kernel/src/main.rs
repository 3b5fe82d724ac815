//! Trellis
//!
//! Serves and inspects the registered block types.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trellis_kernel::content::Attributes;
use trellis_kernel::routes::block_types::BlockTypeView;
use trellis_kernel::{AppState, Config};

#[derive(Parser)]
#[command(name = "trellis", version, about = "Block type registry and renderer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the block type and block renderer HTTP API (default).
    Serve,
    /// Print registered block types with their resolved defaults as JSON.
    List,
    /// Render one block to stdout.
    Render {
        /// Block identifier, e.g. wp-bootstrap-blocks/column.
        identifier: String,
        /// Attributes as a JSON object.
        #[arg(long, default_value = "{}")]
        attributes: String,
        /// Inner content markup.
        #[arg(long, default_value = "")]
        content: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let state = AppState::new(&config).context("failed to initialize block registry")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, state).await,
        Command::List => {
            println!("{}", list_json(&state)?);
            Ok(())
        }
        Command::Render {
            identifier,
            attributes,
            content,
        } => {
            let attributes = parse_attributes(&attributes)?;
            let html = state
                .registry()
                .render_block(&identifier, &attributes, &content)
                .with_context(|| format!("failed to render {identifier}"))?;
            println!("{html}");
            Ok(())
        }
    }
}

/// Registered block types with their resolved defaults, as pretty JSON.
fn list_json(state: &AppState) -> Result<String> {
    let views: Vec<BlockTypeView> = state
        .registry()
        .list()
        .iter()
        .map(|b| BlockTypeView::from(b.as_ref()))
        .collect();
    serde_json::to_string_pretty(&views).context("failed to serialize")
}

/// Parse the `--attributes` argument; only a JSON object is accepted.
fn parse_attributes(raw: &str) -> Result<Attributes> {
    match serde_json::from_str::<Value>(raw).context("--attributes must be JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("--attributes must be a JSON object"),
    }
}

async fn serve(config: &Config, state: AppState) -> Result<()> {
    info!(block_types = state.registry().len(), "Starting Trellis");

    let app = trellis_kernel::routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trellis=info,trellis_kernel=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
