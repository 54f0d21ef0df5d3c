use anyhow::Result;
use bookshelf_core::AppConfig;
use bookshelf_service::CatalogService;
use bookshelf_storage::SqliteStorage;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Personal book catalog with spreadsheet import/export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web application
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Write every book to a spreadsheet
    Export {
        /// Output workbook, defaults to BOOKSHELF_EXPORT_PATH
        path: Option<PathBuf>,
    },
    /// Bulk insert books from a spreadsheet
    Import {
        /// Input workbook, defaults to BOOKSHELF_IMPORT_PATH
        path: Option<PathBuf>,
    },
    /// Print the catalog as JSON
    List,
}

pub(crate) async fn open_catalog(config: &AppConfig) -> Result<Arc<CatalogService>> {
    let storage = SqliteStorage::connect(&config.database_url, config.db_pool_size).await?;
    Ok(Arc::new(CatalogService::new(Arc::new(storage), config.search_mode)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(&config, port, host).await,
        Commands::Export { path } => {
            let path = path.unwrap_or_else(|| config.export_path.clone());
            commands::catalog::run_export(&config, &path).await
        },
        Commands::Import { path } => {
            let path = path.unwrap_or_else(|| config.import_path.clone());
            commands::catalog::run_import(&config, &path).await
        },
        Commands::List => commands::catalog::run_list(&config).await,
    }
}
