pub mod book_instances;
pub mod books;

use std::sync::Arc;

use catalog_db::DocumentStore;
use catalog_kernel::{settings::Settings, ModuleRegistry};

/// Register all catalog modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: &DocumentStore,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register(Arc::new(book_instances::BookInstancesModule::new(
        store.clone(),
        &settings.server.base_path,
    )?))?;
    Ok(())
}
