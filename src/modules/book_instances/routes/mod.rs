//! HTTP handlers for book instances, one file per operation group.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use catalog_db::DocId;
use catalog_http::{error::AppError, views::Views};

use super::{
    form::Rejected,
    repository::BookInstanceRepositoryArc,
    views::{CatalogPaths, FormContext, FORM_TEMPLATE},
};
use crate::modules::books::BookRepositoryArc;

mod create;
mod delete;
mod detail;
mod list;
mod update;

pub(crate) const LIST_TITLE: &str = "Book Instance List";
pub(crate) const CREATE_TITLE: &str = "Create BookInstance";
pub(crate) const UPDATE_TITLE: &str = "Update BookInstance";
pub(crate) const DELETE_TITLE: &str = "Delete BookInstance";

const NOT_FOUND_MESSAGE: &str = "Book copy not found";

/// `(method, path)` pairs served by the module, relative to the base path.
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/bookinstances"),
    ("GET", "/bookinstance/create"),
    ("POST", "/bookinstance/create"),
    ("GET", "/bookinstance/{id}"),
    ("GET", "/bookinstance/{id}/update"),
    ("POST", "/bookinstance/{id}/update"),
    ("GET", "/bookinstance/{id}/delete"),
    ("POST", "/bookinstance/{id}/delete"),
];

/// Collaborators shared by every handler.
#[derive(Debug, Clone)]
pub struct BookInstancesState {
    pub instances: BookInstanceRepositoryArc,
    pub books: BookRepositoryArc,
    pub views: Views,
    pub paths: CatalogPaths,
}

pub fn router(state: BookInstancesState) -> Router {
    let index = state.paths.list();

    Router::new()
        .route(
            "/",
            get(move || {
                let index = index.clone();
                async move { Redirect::to(&index) }
            }),
        )
        .route("/bookinstances", get(list::list))
        .route(
            "/bookinstance/create",
            get(create::form).post(create::submit),
        )
        .route("/bookinstance/{id}", get(detail::detail))
        .route(
            "/bookinstance/{id}/update",
            get(update::form).post(update::submit),
        )
        .route(
            "/bookinstance/{id}/delete",
            get(delete::form).post(delete::submit),
        )
        .with_state(state)
}

fn not_found() -> AppError {
    AppError::not_found(NOT_FOUND_MESSAGE)
}

/// Path ids that do not parse can never match a stored instance.
fn parse_id(raw: &str) -> Result<DocId, AppError> {
    DocId::parse(raw).ok_or_else(not_found)
}

/// Re-render the create/update form with the rejected submission.
async fn render_rejected(
    state: &BookInstancesState,
    context: FormContext,
    rejected: Rejected,
) -> Result<Response, AppError> {
    tracing::debug!(
        errors = rejected.errors.len(),
        "book instance submission rejected"
    );

    let page = context
        .values(rejected.values)
        .errors(rejected.errors)
        .load(state.books.as_ref(), &state.paths)
        .await?;
    let html = state.views.render(FORM_TEMPLATE, &page)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
}
