//! Application bootstrap: store, module registry and the HTTP server lifecycle.

use anyhow::Context;
use catalog_db::DocumentStore;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Open the document store and load the configured seed, if any.
pub async fn open_store(settings: &Settings) -> anyhow::Result<DocumentStore> {
    let store = DocumentStore::new(settings.database.name.clone());

    if let Some(seed_path) = &settings.database.seed_path {
        let summary = store
            .load_seed(seed_path)
            .await
            .with_context(|| format!("failed to load seed from {}", seed_path.display()))?;
        for (collection, loaded) in &summary.counts {
            let stored = store.count(collection).await?;
            tracing::info!(
                collection = %collection,
                loaded,
                stored,
                "collection seeded"
            );
        }
    }

    Ok(store)
}

/// Registry holding every catalog module, wired to `store`.
pub fn build_registry(store: &DocumentStore, settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings)?;
    tracing::info!(modules = registry.module_count(), "modules registered");
    Ok(registry)
}

/// Run the catalog until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.name,
        "catalog bootstrap starting"
    );

    let store = open_store(&settings).await?;
    let registry = build_registry(&store, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = catalog_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_holds_book_instances_module() {
        let settings = Settings::default();
        let store = open_store(&settings).await.unwrap();
        let registry = build_registry(&store, &settings).unwrap();

        assert_eq!(registry.module_count(), 1);
        let module = registry.get_module("book_instances").unwrap();
        assert!(module
            .route_table()
            .contains(&("POST", "/bookinstance/{id}/delete")));
    }

    #[tokio::test]
    async fn missing_seed_file_fails_startup() {
        let mut settings = Settings::default();
        settings.database.seed_path = Some("does/not/exist.json".into());
        let err = open_store(&settings).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to load seed"));
    }

    #[tokio::test]
    async fn sample_seed_is_stored() {
        let mut settings = Settings::default();
        settings.database.seed_path =
            Some(std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/seed.json"));

        let store = open_store(&settings).await.unwrap();
        assert_eq!(store.count("books").await.unwrap(), 4);
        assert_eq!(store.count("bookinstances").await.unwrap(), 4);
    }
}
