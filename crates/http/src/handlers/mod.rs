#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod admin;
pub mod books;
pub mod catalog;
pub mod transfer;

use axum::http::StatusCode;
use axum::response::{Html, Response};

use crate::flash::{Flash, Session};
use crate::AppState;

/// Drain the session's notices into `view` and send it with `status`.
pub(crate) async fn render<F>(
    state: &AppState,
    session: Session,
    status: StatusCode,
    view: F,
) -> Response
where
    F: FnOnce(&[Flash]) -> Html<String>,
{
    let flashes = state.flashes.take(&session).await;
    session.attach((status, view(&flashes)))
}

/// Queue `flash` for the session and redirect to `path`.
pub(crate) async fn redirect_with(
    state: &AppState,
    session: Session,
    path: &str,
    flash: Flash,
) -> Response {
    state.flashes.push(&session, flash).await;
    session.redirect(path)
}
