use anyhow::Result;
use bookshelf_core::AppConfig;
use bookshelf_http::{create_router, AppState};
use std::sync::Arc;

use crate::open_catalog;

pub(crate) async fn run(config: &AppConfig, port: u16, host: String) -> Result<()> {
    let catalog = open_catalog(config).await?;
    tracing::info!(
        database = %config.database_url,
        search_mode = %config.search_mode,
        export_path = %config.export_path.display(),
        import_path = %config.import_path.display(),
        "Catalog ready"
    );

    let state = Arc::new(AppState::new(catalog, config));
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
