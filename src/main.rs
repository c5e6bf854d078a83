//! modelsync - option schema build and model synchronization
//!
//! Builds the option schema for the grid control, prints the resulting
//! registry snapshot, and when a model document is configured, synchronizes a
//! freshly created grid from it and prints the applied options.

use modelsync::config::{LogFormat, LoggingConfig, Settings};
use modelsync::grid::{self, GridControl};
use modelsync::{run_schema_build, Describe, ModelNode, SchemaRegistry};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    init_tracing(&settings.logging);

    info!("🚀 Starting modelsync...");
    info!("📋 Configuration loaded (base node: {})", settings.model.base_node);

    // Schema-build phase
    let table = grid::grid_type_table()?;
    let mut registry = SchemaRegistry::new();
    let mut grid_extender = grid::grid_extender(
        &settings.model.base_node,
        settings.model.editor_pattern.clone(),
    );

    let summary = run_schema_build(&table, &mut registry, &mut [&mut grid_extender])?;
    for (name, reason) in &summary.failed {
        warn!("⚠️  {} skipped during schema build: {}", name, reason);
    }
    info!("✅ Option schema built ({} node types)", registry.len());

    println!("{}", serde_json::to_string_pretty(&registry.snapshot())?);

    // Runtime phase
    let Some(path) = &settings.model.model_file else {
        info!("No MODELSYNC_MODEL_FILE configured, skipping synchronization");
        return Ok(());
    };

    let document = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read model file {}: {}", path.display(), e))?;
    let root = ModelNode::from_json(&document)?;
    info!("📄 Model loaded from {}", path.display());

    report_unknown_fields(&root, &registry);

    let mut control = GridControl::default();
    let report = grid_extender.on_control_created(&root, &mut control);
    if !report.anchor_found {
        info!("No options configured for {}", GridControl::type_name());
    }

    println!("{}", serde_json::to_string_pretty(&control)?);
    info!("👋 Done");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init(),
    }
}

/// Warn about configured values that no registered node type declares
fn report_unknown_fields(root: &ModelNode, registry: &SchemaRegistry) {
    for owner in registry.owners() {
        let Some(options) = root.child(owner) else {
            continue;
        };
        for node_type in registry.children(owner) {
            if let Some(node) = options.child(&node_type.identifier) {
                for name in node.unknown_fields(node_type) {
                    warn!("⚠️  {}.{}.{} is not a known option", owner, node_type.identifier, name);
                }
            }
        }
    }
}
