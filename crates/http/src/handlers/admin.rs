use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use std::sync::Arc;

use crate::app_error::AppError;
use crate::flash::{Flash, Session};
use crate::handlers::{redirect_with, render};
use crate::{views, AppState};

pub async fn delete_db(State(state): State<Arc<AppState>>, session: Session) -> Response {
    render(&state, session, StatusCode::OK, views::delete_db_page).await
}

pub async fn delete_db_confirmed(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, AppError> {
    state.catalog.delete_all().await?;
    Ok(redirect_with(&state, session, "/", Flash::success("Database Deletion Successful!")).await)
}
