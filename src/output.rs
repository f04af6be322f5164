//! Output formatting and persistence for query results.
//!
//! Supports pretty JSON (stdout or file), a flat per-cell CSV export and a
//! log-only summary.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::engine::types::HeatmapResult;

/// One CSV row per heatmap cell. Factors are flattened into fixed columns.
#[derive(Debug, Serialize)]
struct CellRow<'a> {
    latitude: f64,
    longitude: f64,
    total_crashes: usize,
    avg_impact: Option<f64>,
    avg_total_duration: Option<f64>,
    factor_1: Option<&'a str>,
    factor_1_count: Option<usize>,
    factor_2: Option<&'a str>,
    factor_2_count: Option<usize>,
    factor_3: Option<&'a str>,
    factor_3_count: Option<usize>,
}

/// Logs a one-line summary and each cell at `debug`.
pub fn log_summary(result: &HeatmapResult) {
    info!(
        metric = %result.metric,
        matched = result.matched_records,
        cells = result.cells.len(),
        "Heatmap ready"
    );
    for cell in &result.cells {
        debug!(
            latitude = cell.cell.latitude,
            longitude = cell.cell.longitude,
            total_crashes = cell.cell.total_crashes,
            "Cell"
        );
    }
}

pub fn to_pretty_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` as pretty JSON to `path`, replacing any existing file.
pub fn write_json_file(path: &str, value: &impl Serialize) -> Result<()> {
    create_parent_dir(path)?;
    let json = to_pretty_json(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write '{path}'"))?;
    debug!(path, "JSON written");
    Ok(())
}

/// Writes the cells of `result` to a CSV file with a header row.
pub fn write_cells_csv(path: &str, result: &HeatmapResult) -> Result<()> {
    create_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create '{path}'"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for cell in &result.cells {
        let c = &cell.cell;
        let factor = |i: usize| c.top_factors.get(i).map(|f| f.factor.as_str());
        let count = |i: usize| c.top_factors.get(i).map(|f| f.count);

        writer.serialize(CellRow {
            latitude: c.latitude,
            longitude: c.longitude,
            total_crashes: c.total_crashes,
            avg_impact: c.avg_impact,
            avg_total_duration: c.avg_total_duration,
            factor_1: factor(0),
            factor_1_count: count(0),
            factor_2: factor(1),
            factor_2_count: count(1),
            factor_3: factor(2),
            factor_3_count: count(2),
        })?;
    }

    writer.flush()?;
    debug!(path, rows = result.cells.len(), "CSV written");
    Ok(())
}

fn create_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for '{path}'"))?;
        }
    }
    Ok(())
}
