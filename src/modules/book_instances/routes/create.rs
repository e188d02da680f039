use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use catalog_http::error::AppError;

use super::{render_rejected, BookInstancesState, CREATE_TITLE};
use crate::modules::book_instances::{
    form::{BookInstanceForm, FormMode},
    views::{FormContext, FORM_TEMPLATE},
};

/// Empty create form.
pub async fn form(State(state): State<BookInstancesState>) -> Result<Html<String>, AppError> {
    let page = FormContext::new(CREATE_TITLE, state.paths.create())
        .load(state.books.as_ref(), &state.paths)
        .await?;
    state.views.render(FORM_TEMPLATE, &page)
}

/// Validate, persist and redirect to the new copy.
pub async fn submit(
    State(state): State<BookInstancesState>,
    form: Result<Form<BookInstanceForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;

    let valid = match form
        .validate_with_books(FormMode::Create, state.books.as_ref())
        .await?
    {
        Ok(valid) => valid,
        Err(rejected) => {
            let context = FormContext::new(CREATE_TITLE, state.paths.create());
            return render_rejected(&state, context, rejected).await;
        }
    };

    let instance = valid.into_new_instance();
    state.instances.save(&instance).await?;
    tracing::info!(instance_id = %instance.id, book_id = %instance.book, "book instance created");

    Ok(Redirect::to(&state.paths.detail(&instance.id)).into_response())
}
