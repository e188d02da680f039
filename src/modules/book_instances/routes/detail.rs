use axum::{
    extract::{Path, State},
    response::Html,
};
use catalog_http::error::AppError;

use super::{not_found, parse_id, BookInstancesState};
use crate::modules::book_instances::views::{DetailView, InstanceRow, Page, DETAIL_TEMPLATE};

pub async fn detail(
    State(state): State<BookInstancesState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&raw_id)?;
    let populated = state
        .instances
        .find_by_id_populated(&id)
        .await?
        .ok_or_else(not_found)?;

    let instance = InstanceRow::new(&populated, &state.paths);
    let title = format!("Book: {}", instance.book_title);
    state.views.render(
        DETAIL_TEMPLATE,
        &Page::new(title, &state.paths, DetailView { instance }),
    )
}
