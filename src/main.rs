use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use medical_data_visualizer::pipeline;
use medical_data_visualizer::VisualizerConfig;

const CONFIG_FILE: &str = "visualizer.json";

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = VisualizerConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("loading configuration")?;

    let output = pipeline::run(&config)
        .with_context(|| format!("visualizing {}", config.input.display()))?;

    log::info!(
        "{} patients charted ({} rows dropped); wrote {} ({}x{}) and {} ({}x{})",
        output.dataset.len(),
        output.report.dropped.len(),
        output.cat_plot.path.display(),
        output.cat_plot.width(),
        output.cat_plot.height(),
        output.heat_map.path.display(),
        output.heat_map.width(),
        output.heat_map.height(),
    );
    Ok(())
}
