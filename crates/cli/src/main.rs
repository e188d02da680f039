use std::path::{Path, PathBuf};

use anyhow::Context;
use catalog_db::DocumentStore;
use catalog_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(version)]
#[command(about = "Local library catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on, overriding `server.port`
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print every route the server mounts
    Routes,

    /// Load a seed file into a scratch store and report collection counts
    CheckSeed {
        /// JSON seed file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            catalog_app::run(settings).await
        }
        Commands::Routes => print_routes(&settings),
        Commands::CheckSeed { path } => check_seed(&path).await,
    }
}

fn print_routes(settings: &Settings) -> anyhow::Result<()> {
    let store = DocumentStore::new("routes");
    let registry = catalog_app::build_registry(&store, settings)?;
    let base_path = settings.server.base_path.trim_end_matches('/');

    println!("GET\t/");
    println!("GET\t/healthz");
    for module in registry.modules() {
        for (method, path) in module.route_table() {
            let path = if path == "/" && !base_path.is_empty() {
                base_path.to_string()
            } else {
                format!("{base_path}{path}")
            };
            println!("{method}\t{path}\t{}", module.name());
        }
    }
    Ok(())
}

async fn check_seed(path: &Path) -> anyhow::Result<()> {
    let store = DocumentStore::new("seed-check");
    let summary = store
        .load_seed(path)
        .await
        .with_context(|| format!("invalid seed file {}", path.display()))?;

    for (collection, count) in &summary.counts {
        println!("{collection}\t{count}");
    }
    println!("total\t{}", summary.total());
    Ok(())
}
