use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use std::sync::Arc;

use crate::app_error::AppError;
use crate::flash::{Flash, Session};
use crate::forms::{BookForm, FormErrors, UpdateForm};
use crate::handlers::{redirect_with, render};
use crate::{views, AppState};

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub book_id: Option<String>,
}

pub async fn add_form(State(state): State<Arc<AppState>>, session: Session) -> Response {
    render(&state, session, StatusCode::OK, |flashes| {
        views::add_page(flashes, &BookForm::default(), &FormErrors::default())
    })
    .await
}

pub async fn add_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let new_book = match form.validate() {
        Ok(book) => book,
        Err(errors) => {
            return Ok(render(&state, session, StatusCode::UNPROCESSABLE_ENTITY, |flashes| {
                views::add_page(flashes, &form, &errors)
            })
            .await);
        },
    };

    match state.catalog.add(&new_book).await {
        Ok(book) => {
            let msg = format!("Book Name : {} Added successfully", book.title);
            Ok(redirect_with(&state, session, "/", Flash::success(msg)).await)
        },
        Err(e) if e.is_duplicate() => {
            let msg = format!(
                "Book Name : {} already exists. Please check information entered.",
                new_book.title()
            );
            Ok(redirect_with(&state, session, "/add", Flash::warning(msg)).await)
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let book = state.catalog.get(id).await?;
    let form = UpdateForm::from_book(&book);
    Ok(render(&state, session, StatusCode::OK, |flashes| {
        views::update_page(flashes, &book, &form, &FormErrors::default())
    })
    .await)
}

pub async fn update_submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<UpdateForm>,
) -> Result<Response, AppError> {
    let book = state.catalog.get(id).await?;
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return Ok(render(&state, session, StatusCode::UNPROCESSABLE_ENTITY, |flashes| {
                views::update_page(flashes, &book, &form, &errors)
            })
            .await);
        },
    };

    match state.catalog.update(id, &update).await {
        Ok(updated) => {
            let msg = format!("Rating for book: {} updated successfully", updated.title);
            Ok(redirect_with(&state, session, "/", Flash::success(msg)).await)
        },
        Err(e) if e.is_duplicate() => {
            let mut errors = FormErrors::default();
            errors.insert("title", format!("Book Name : {} already exists.", update.title()));
            Ok(render(&state, session, StatusCode::UNPROCESSABLE_ENTITY, |flashes| {
                views::update_page(flashes, &book, &form, &errors)
            })
            .await)
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<DeleteQuery>,
) -> Result<Response, AppError> {
    let raw = query.book_id.unwrap_or_default();
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid book_id: {raw:?}")))?;

    let book = state.catalog.delete(id).await?;
    let msg = format!("Book Name : {} Deleted successfully", book.title);
    Ok(redirect_with(&state, session, "/", Flash::danger(msg)).await)
}
