//! Book instances: physical copies of catalog books, with full CRUD pages.

pub mod form;
pub mod models;
pub mod repository;
pub mod routes;
pub mod views;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use catalog_db::DocumentStore;
use catalog_kernel::{InitCtx, Module};

use crate::modules::books::{BookRepositoryArc, DocumentBookRepository};

pub use models::{BookInstance, BookInstanceStatus, PopulatedBookInstance};
pub use repository::{
    BookInstanceRepository, BookInstanceRepositoryArc, DocumentBookInstanceRepository,
};
pub use routes::BookInstancesState;

pub struct BookInstancesModule {
    state: BookInstancesState,
}

impl BookInstancesModule {
    /// Module backed by the document store.
    pub fn new(store: DocumentStore, base_path: &str) -> anyhow::Result<Self> {
        let books: BookRepositoryArc = Arc::new(DocumentBookRepository::new(store.clone()));
        let instances = Arc::new(DocumentBookInstanceRepository::new(store, books.clone()));
        Self::with_repositories(instances, books, base_path)
    }

    /// Module over caller-supplied repositories.
    pub fn with_repositories(
        instances: BookInstanceRepositoryArc,
        books: BookRepositoryArc,
        base_path: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            state: BookInstancesState {
                instances,
                books,
                views: views::build_views()?,
                paths: views::CatalogPaths::new(base_path),
            },
        })
    }
}

#[async_trait]
impl Module for BookInstancesModule {
    fn name(&self) -> &'static str {
        "book_instances"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            base_path = %ctx.settings.server.base_path,
            "initializing module"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn route_table(&self) -> Vec<(&'static str, &'static str)> {
        routes::ROUTE_TABLE.to_vec()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.state.instances.find_all().await?.len();
        tracing::info!(module = self.name(), instances = count, "module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "module stopped");
        Ok(())
    }
}
