use axum::{extract::State, response::Html};
use catalog_http::error::AppError;

use super::{BookInstancesState, LIST_TITLE};
use crate::modules::book_instances::views::{InstanceRow, ListView, Page, LIST_TEMPLATE};

/// Every book instance with its book resolved.
pub async fn list(State(state): State<BookInstancesState>) -> Result<Html<String>, AppError> {
    let instances = state.instances.find_all_populated().await?;
    tracing::debug!(count = instances.len(), "listing book instances");

    let rows = instances
        .iter()
        .map(|populated| InstanceRow::new(populated, &state.paths))
        .collect();

    state.views.render(
        LIST_TEMPLATE,
        &Page::new(LIST_TITLE, &state.paths, ListView { instances: rows }),
    )
}
