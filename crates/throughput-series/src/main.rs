mod bootstrap;

use anyhow::{Context, Result};
use series_core::settings::{ExtractorConfig, Settings};
use series_data::analysis::run_batch;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("throughput-series v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ExtractorConfig::load(settings.config.as_deref())
        .context("failed to load extractor configuration")?;
    let plan = settings.batch_plan();
    tracing::info!(
        "Batch: {} trials from port {} in {}, span {}s",
        plan.trials,
        plan.start_port,
        plan.input_dir.display(),
        plan.span()
    );

    let result = run_batch(&plan, &config)?;

    bootstrap::ensure_output_dir(&settings.output_dir)?;
    for path in result.matrix.write_series(&settings.output_dir, &config)? {
        tracing::info!("Wrote {}", path.display());
    }

    if let Some(report_path) = &settings.report {
        result.report.write_to(report_path)?;
        tracing::info!("Wrote report to {}", report_path.display());
    }

    Ok(())
}
