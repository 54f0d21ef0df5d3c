use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use std::sync::Arc;

use crate::app_error::AppError;
use crate::flash::Session;
use crate::forms::SearchForm;
use crate::handlers::render;
use crate::{views, AppState};

pub async fn home(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, AppError> {
    let count = state.catalog.count().await?;
    Ok(render(&state, session, StatusCode::OK, |flashes| views::home(flashes, count)).await)
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, AppError> {
    let books = state.catalog.list().await?;
    Ok(render(&state, session, StatusCode::OK, |flashes| views::list_page(flashes, &books)).await)
}

pub async fn search_form(State(state): State<Arc<AppState>>, session: Session) -> Response {
    render(&state, session, StatusCode::OK, |flashes| {
        views::search_page(flashes, &SearchForm::default())
    })
    .await
}

pub async fn search_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let books = state.catalog.search(&form.filter()).await?;
    let mode = state.catalog.search_mode();
    tracing::debug!(title = %form.title, author = %form.author, %mode, hits = books.len(), "Search");
    Ok(render(&state, session, StatusCode::OK, |flashes| {
        views::search_results_page(flashes, &form, &books, mode)
    })
    .await)
}
