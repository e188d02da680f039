use anyhow::Context;
use catalog_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_app::run(settings).await
}
