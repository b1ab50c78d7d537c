//! The chart pipeline.
//!
//! EXECUTION ORDER (fixed, runs once per call):
//!   1. Generate the metric table from the seed.
//!   2. Reduce it to a Pearson correlation matrix.
//!   3. Render the heatmap into an owned figure.
//!   4. Export the figure as PNG (consumes it).

use crate::{
    config::ChartConfig,
    correlation::CorrelationMatrix,
    error::ChartResult,
    figure::export_png,
    generator, heatmap,
    table::MetricTable,
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ChartReport {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub matrix: CorrelationMatrix,
}

/// Steps 1–2 only: the table and its correlations, no rendering.
pub fn analyze(config: &ChartConfig) -> ChartResult<(MetricTable, CorrelationMatrix)> {
    let table = generator::generate(config.seed, config.customers, config.variant)?;
    let matrix = CorrelationMatrix::from_table(&table)?;
    Ok((table, matrix))
}

pub fn run(config: &ChartConfig) -> ChartResult<ChartReport> {
    config.validate()?;

    let (table, matrix) = analyze(config)?;
    log::info!(
        "pipeline: generated {} rows x {} metrics (seed={}, variant={})",
        table.rows(),
        table.len(),
        config.seed,
        config.variant.as_str()
    );

    let figure = heatmap::render(&matrix, &config.heatmap, config.resolution)?;
    log::info!("pipeline: rendered {}x{} heatmap", figure.width(), figure.height());

    let export = export_png(figure, &config.output)?;

    if config.verbose {
        let name = export
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| export.path.display().to_string());
        println!(
            "{name} saved successfully with {}x{} dimensions.",
            export.width, export.height
        );
    }

    Ok(ChartReport {
        output: export.path,
        width: export.width,
        height: export.height,
        rows: table.rows(),
        matrix,
    })
}
