//! Spreadsheet export and import routes.

use axum::extract::State;
use axum::response::Response;
use std::sync::Arc;

use crate::flash::{Flash, Session};
use crate::AppState;

const EXPORT_FAILED: &str = "Export failed. Check the server log for details.";
const IMPORT_FAILED: &str = "Import failed. Check the server log for details.";

pub async fn export(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let path = state.export_path.display().to_string();
    let flash = match state.catalog.export(&state.export_path).await {
        Ok(_) => {
            Flash::success(format!("Export Successful! Your database has been save under {path}"))
        },
        Err(e) => {
            tracing::error!(error = %e, %path, "Export failed");
            Flash::danger(EXPORT_FAILED)
        },
    };
    state.flashes.push(&session, flash).await;
    session.redirect("/")
}

pub async fn import(State(state): State<Arc<AppState>>, session: Session) -> Response {
    match state.catalog.import(&state.import_path).await {
        Ok(report) => {
            let duplicates = report.duplicates.iter().map(|title| {
                Flash::warning(format!(
                    "Book Name : {title} already exists. Please remove from database and try again."
                ))
            });
            let failures = report
                .failures
                .iter()
                .map(|failure| Flash::danger(format!("Row {}: {}", failure.row, failure.reason)));
            let summary = Flash::success(format!(
                "Import Database Successfully ({} added)",
                report.imported.len()
            ));
            state
                .flashes
                .extend(&session, duplicates.chain(failures).chain(std::iter::once(summary)))
                .await;
        },
        Err(e) => {
            tracing::error!(error = %e, path = %state.import_path.display(), "Import failed");
            state.flashes.push(&session, Flash::danger(IMPORT_FAILED)).await;
        },
    }
    session.redirect("/")
}
