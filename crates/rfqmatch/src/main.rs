use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfqmatch_common::{logger, AppConfig};
use rfqmatch_embedding::{Embedder, OpenAiClient};
use rfqmatch_matcher::RfqMatcher;
use rfqmatch_vector::{load_catalog, BuildOptions, CatalogIndex};
use std::path::PathBuf;
use std::sync::Arc;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "rfqmatch")]
#[command(about = "Match free-text RFQ line items against a product catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog index and start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Catalog CSV path
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Build the catalog index, match one RFQ and print the reports as JSON
    Match {
        /// RFQ text; line items separated by commas or newlines
        rfq: String,

        /// Catalog CSV path
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Startup phase: embed the catalog and build the immutable index
///
/// Any error here means the service must not start.
async fn build_matcher(config: &AppConfig) -> Result<Arc<RfqMatcher>> {
    config.validate()?;

    let client = OpenAiClient::from_config(config)?;
    let embedder: Arc<dyn Embedder> = Arc::new(client);

    let rows = load_catalog(&config.catalog_path, &config.catalog_quantity_column)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

    let options = BuildOptions {
        concurrency: config.embed_concurrency,
        expected_dimension: config.embedding_dimensions,
    };
    let index = CatalogIndex::build(rows, embedder.as_ref(), &options)
        .await
        .context("building catalog index")?;

    Ok(Arc::new(RfqMatcher::new(Arc::new(index), embedder)))
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Match { rfq, catalog }) => {
            if let Some(catalog) = catalog {
                config.catalog_path = catalog;
            }
            logger::setup_console_logging(&config.log_level)?;

            let matcher = build_matcher(&config).await?;
            let reports = matcher.match_rfq(&rfq).await;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        command => {
            if let Some(Commands::Serve { host, port, catalog }) = command {
                if let Some(host) = host {
                    config.server_host = host;
                }
                if let Some(port) = port {
                    config.server_port = port;
                }
                if let Some(catalog) = catalog {
                    config.catalog_path = catalog;
                }
            }

            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("RFQ matcher starting...");
            tracing::info!("  Bind: {}", config.server_bind_address());
            tracing::info!("  Catalog: {}", config.catalog_path.display());
            tracing::info!("  Embedding model: {}", config.embedding_model);

            let matcher = build_matcher(&config).await.map_err(|e| {
                tracing::error!("Startup failed: {:#}", e);
                e
            })?;

            println!("Server listening on http://{}", config.server_bind_address());
            rfqmatch_server::start_server(config, matcher).await?;
        }
    }

    Ok(())
}
