use std::path::Path;

use crate::config::VisualizerConfig;
use crate::data::derive::{derive_features, DerivationOptions, DerivationReport};
use crate::data::filter::{clean_for_heatmap, PercentileBand};
use crate::data::loader::load_file;
use crate::data::model::MedicalDataset;
use crate::data::reshape::{indicator_table, IndicatorTable};
use crate::error::Result;
use crate::render::{self, Figure};
use crate::stats::{CorrelationMatrix, TriangularMask};

// ---------------------------------------------------------------------------
// Shared stage: load once, derive once
// ---------------------------------------------------------------------------

/// Load the examination file and derive features.
pub fn prepare(path: &Path, options: &DerivationOptions) -> Result<(MedicalDataset, DerivationReport)> {
    let table = load_file(path)?;
    Ok(derive_features(table, options)?)
}

// ---------------------------------------------------------------------------
// Branch 1: categorical chart
// ---------------------------------------------------------------------------

/// Data behind the categorical chart.
pub fn cat_plot_data(dataset: &MedicalDataset) -> IndicatorTable {
    indicator_table(dataset)
}

/// Reshape and draw the categorical chart.
pub fn draw_cat_plot(dataset: &MedicalDataset, path: &Path, size: (u32, u32)) -> Result<Figure> {
    Ok(render::draw_cat_plot(&cat_plot_data(dataset), path, size)?)
}

// ---------------------------------------------------------------------------
// Branch 2: heat map
// ---------------------------------------------------------------------------

/// Correlation matrix of the cleaned rows and the mask hiding its redundant half.
#[derive(Debug, Clone)]
pub struct HeatMapData {
    pub matrix: CorrelationMatrix,
    pub mask: TriangularMask,
    /// Rows that survived cleaning.
    pub rows: usize,
}

/// Clean, correlate and mask.
pub fn heat_map_data(dataset: &MedicalDataset, band: PercentileBand) -> HeatMapData {
    let cleaned = clean_for_heatmap(dataset, band);
    let matrix = CorrelationMatrix::from_rows(&cleaned);
    let mask = TriangularMask::for_matrix(&matrix);
    HeatMapData {
        matrix,
        mask,
        rows: cleaned.len(),
    }
}

/// Clean, correlate and draw the heat map.
pub fn draw_heat_map(
    dataset: &MedicalDataset,
    band: PercentileBand,
    path: &Path,
    size: (u32, u32),
) -> Result<Figure> {
    let data = heat_map_data(dataset, band);
    Ok(render::draw_heat_map(&data.matrix, &data.mask, path, size)?)
}

// ---------------------------------------------------------------------------
// Whole run
// ---------------------------------------------------------------------------

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub dataset: MedicalDataset,
    pub report: DerivationReport,
    pub cat_plot: Figure,
    pub heat_map: Figure,
}

/// Load, derive, then produce both charts.
pub fn run(config: &VisualizerConfig) -> Result<RunOutput> {
    let (dataset, report) = prepare(&config.input, &config.derivation_options())?;

    let cat_plot = draw_cat_plot(&dataset, &config.cat_plot_output, config.cat_plot_size)?;
    let heat_map = draw_heat_map(
        &dataset,
        config.percentile_band,
        &config.heat_map_output,
        config.heat_map_size,
    )?;

    Ok(RunOutput {
        dataset,
        report,
        cat_plot,
        heat_map,
    })
}
