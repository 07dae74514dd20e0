mod config;
mod fabric;
mod graph;
mod ipam;
mod models;
mod output;
mod render;
mod utils;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use fabric::FabricBuilder;
use models::FabricConfig;
use output::OutputWriter;
use render::ConfigRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fabric_gen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::load();
    tracing::info!("Fabric config: {}", cfg.fabric_config);
    tracing::info!("Template: {}", cfg.template_path);

    let fabric_config = FabricConfig::load(&cfg.fabric_config).await?;
    let fabric = FabricBuilder::from_config(&fabric_config)
        .and_then(FabricBuilder::build)
        .with_context(|| format!("Failed to build fabric {}", fabric_config.dc_name))?;
    tracing::info!(
        "Built fabric {}: {} spines, {} leaves, {} links",
        fabric.name(),
        fabric.spines().len(),
        fabric.leaves().len(),
        fabric.links().len()
    );

    let renderer = ConfigRenderer::from_file(&cfg.template_path).await?;
    let writer = OutputWriter::new(&cfg);
    writer.write_configs(&fabric, &renderer).await?;
    writer.write_diagrams(&fabric).await?;
    if let Some(path) = &cfg.fabric_json {
        writer.write_json(&fabric, path).await?;
    }

    tracing::info!("Done");
    Ok(())
}
