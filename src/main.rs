use anyhow::Context;
use log::{info, warn};
use std::env;
use std::fs::File;
use std::path::PathBuf;
use stunting_screen::batch;
use stunting_screen::{EngineConfig, ScreeningEngine, TimeRange};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Data directory with the reference table, artifacts and history DB
    let data_dir = env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("./data"), PathBuf::from);
    if !data_dir.exists() {
        warn!("Data directory not found: {}", data_dir.display());
        return Ok(());
    }

    info!("Loading screening engine from: {}", data_dir.display());
    let config = EngineConfig::from_dir(&data_dir);
    let engine = ScreeningEngine::open(&config).context("failed to open screening engine")?;

    // Optional bulk upload: score it, record it, export the results
    if let Some(upload) = env::args().nth(2).map(PathBuf::from) {
        info!("Scoring bulk upload: {}", upload.display());
        let file = File::open(&upload)
            .with_context(|| format!("failed to open upload {}", upload.display()))?;
        let report = batch::run_batch(&engine, file, true)?;

        for row in &report.rejected {
            warn!("Line {} excluded: {}", row.line, row.reason);
        }
        for (status, count) in report.status_counts() {
            info!("  {status}: {count}");
        }

        let results_path = upload.with_extension("results.csv");
        let out = File::create(&results_path)
            .with_context(|| format!("failed to create {}", results_path.display()))?;
        batch::write_assessments_csv(&report.assessments, out)?;
        info!("Results written to: {}", results_path.display());
    }

    let entries = engine.log().query(&TimeRange::all())?;
    info!("History contains {} assessments", entries.len());

    Ok(())
}
