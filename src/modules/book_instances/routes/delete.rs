use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use catalog_db::DocId;
use catalog_http::error::AppError;

use super::{BookInstancesState, DELETE_TITLE};
use crate::modules::book_instances::{
    form::{DeleteForm, FieldError},
    views::{DeleteView, InstanceRow, Page, DELETE_TEMPLATE},
};

/// Delete confirmation; unknown copies send the reader back to the list.
pub async fn form(
    State(state): State<BookInstancesState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    confirmation(&state, &raw_id, Vec::new()).await
}

/// Remove the copy named by `bookinstanceid`. Deleting a missing copy is a no-op.
pub async fn submit(
    State(state): State<BookInstancesState>,
    Path(raw_id): Path<String>,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;

    match form.target() {
        Ok(Some(id)) => match state.instances.find_by_id_and_remove(&id).await? {
            Some(_) => tracing::info!(instance_id = %id, "book instance deleted"),
            None => tracing::debug!(instance_id = %id, "book instance already gone"),
        },
        Ok(None) => tracing::debug!("delete target is not a valid id"),
        Err(error) => return confirmation(&state, &raw_id, vec![error]).await,
    }

    Ok(Redirect::to(&state.paths.list()).into_response())
}

async fn confirmation(
    state: &BookInstancesState,
    raw_id: &str,
    errors: Vec<FieldError>,
) -> Result<Response, AppError> {
    let populated = match DocId::parse(raw_id) {
        Some(id) => state.instances.find_by_id_populated(&id).await?,
        None => None,
    };
    let Some(populated) = populated else {
        return Ok(Redirect::to(&state.paths.list()).into_response());
    };

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let view = DeleteView {
        instance: InstanceRow::new(&populated, &state.paths),
        errors,
    };
    let html = state
        .views
        .render(DELETE_TEMPLATE, &Page::new(DELETE_TITLE, &state.paths, view))?;
    Ok((status, html).into_response())
}
