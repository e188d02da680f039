use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use catalog_http::error::AppError;

use super::{not_found, parse_id, render_rejected, BookInstancesState, UPDATE_TITLE};
use crate::modules::book_instances::{
    form::{BookInstanceForm, FormMode, FormValues},
    views::{FormContext, FORM_TEMPLATE},
};

/// Update form pre-filled with the stored copy.
pub async fn form(
    State(state): State<BookInstancesState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&raw_id)?;

    let (instance, titles) = tokio::try_join!(
        state.instances.find_by_id(&id),
        state.books.find_all_titles()
    )?;
    let instance = instance.ok_or_else(not_found)?;

    let page = FormContext::new(UPDATE_TITLE, state.paths.update(&id))
        .values(FormValues::from_instance(&instance))
        .with_books(titles, &state.paths);
    state.views.render(FORM_TEMPLATE, &page)
}

/// Replace the stored copy in place, keeping its id.
pub async fn submit(
    State(state): State<BookInstancesState>,
    Path(raw_id): Path<String>,
    form: Result<Form<BookInstanceForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = parse_id(&raw_id)?;
    let Form(form) = form?;

    if state.instances.find_by_id(&id).await?.is_none() {
        return Err(not_found());
    }

    let valid = match form
        .validate_with_books(FormMode::Update, state.books.as_ref())
        .await?
    {
        Ok(valid) => valid,
        Err(rejected) => {
            let context = FormContext::new(UPDATE_TITLE, state.paths.update(&id));
            return render_rejected(&state, context, rejected).await;
        }
    };

    let instance = valid.into_instance(id);
    state
        .instances
        .find_by_id_and_update(&id, &instance)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(instance_id = %id, status = %instance.status, "book instance updated");

    Ok(Redirect::to(&state.paths.detail(&id)).into_response())
}
