//! Web front end for the bookshelf catalog.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(unused_results, reason = "Some results are intentionally ignored")]
#![allow(missing_copy_implementations, reason = "Types may grow")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::shadow_reuse, reason = "Shadowing for Arc clones is idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod app_error;
pub mod flash;
pub mod forms;
mod handlers;
pub mod views;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use bookshelf_core::AppConfig;
use bookshelf_service::CatalogService;
use tower_http::trace::TraceLayer;

use crate::flash::FlashStore;

pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub flashes: FlashStore,
    pub export_path: PathBuf,
    pub import_path: PathBuf,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Arc<CatalogService>, config: &AppConfig) -> Self {
        Self {
            catalog,
            flashes: FlashStore::default(),
            export_path: config.export_path.clone(),
            import_path: config.import_path.clone(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    use handlers::{admin, books, catalog, transfer};

    Router::new()
        .route("/", get(catalog::home))
        .route("/health", get(health))
        .route("/add", get(books::add_form).post(books::add_submit))
        .route("/book/{id}", get(books::update_form).post(books::update_submit))
        .route("/delete", get(books::delete))
        .route("/list", get(catalog::list).post(catalog::list))
        .route("/search", get(catalog::search_form).post(catalog::search_submit))
        .route("/export", get(transfer::export).post(transfer::export))
        .route("/import", get(transfer::import))
        .route("/delete_db", get(admin::delete_db))
        .route("/delete_db1", get(admin::delete_db_confirmed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
