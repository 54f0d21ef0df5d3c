use anyhow::Result;
use bookshelf_core::AppConfig;
use std::path::Path;

use crate::open_catalog;

pub(crate) async fn run_export(config: &AppConfig, path: &Path) -> Result<()> {
    let catalog = open_catalog(config).await?;
    let count = catalog.export(path).await?;
    let report = serde_json::json!({ "path": path.display().to_string(), "exported": count });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_import(config: &AppConfig, path: &Path) -> Result<()> {
    let catalog = open_catalog(config).await?;
    let report = catalog.import(path).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_list(config: &AppConfig) -> Result<()> {
    let catalog = open_catalog(config).await?;
    let books = catalog.list().await?;
    println!("{}", serde_json::to_string_pretty(&books)?);
    Ok(())
}
