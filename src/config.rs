use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::derive::{DataQualityPolicy, DerivationOptions, DEFAULT_BMI_THRESHOLD};
use crate::data::filter::PercentileBand;
use crate::error::VisualizerError;

/// Settings for a visualizer run. Every field has a default, so a JSON
/// override only needs the keys it changes:
///
/// ```json
/// { "heat_map_output": "out/heatmap.png", "data_quality": "drop_rows" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    pub input: PathBuf,
    pub cat_plot_output: PathBuf,
    pub heat_map_output: PathBuf,
    pub percentile_band: PercentileBand,
    pub bmi_threshold: f64,
    pub data_quality: DataQualityPolicy,
    /// Pixel size of the two-facet bar chart.
    pub cat_plot_size: (u32, u32),
    /// Pixel size of the heat map (12 x 9 in at 100 dpi).
    pub heat_map_size: (u32, u32),
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("medical_examination.csv"),
            cat_plot_output: PathBuf::from("catplot.png"),
            heat_map_output: PathBuf::from("heatmap.png"),
            percentile_band: PercentileBand::default(),
            bmi_threshold: DEFAULT_BMI_THRESHOLD,
            data_quality: DataQualityPolicy::Abort,
            cat_plot_size: (1000, 500),
            heat_map_size: (1200, 900),
        }
    }
}

impl VisualizerConfig {
    /// Read a JSON override file.
    pub fn from_json_file(path: &Path) -> Result<Self, VisualizerError> {
        let config_err = |message: String| VisualizerError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        config.validate().map_err(config_err)?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, VisualizerError> {
        if path.exists() {
            log::info!("Using config {}", path.display());
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn derivation_options(&self) -> DerivationOptions {
        DerivationOptions {
            bmi_threshold: self.bmi_threshold,
            policy: self.data_quality,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let band = self.percentile_band;
        if !(0.0..=1.0).contains(&band.lower)
            || !(0.0..=1.0).contains(&band.upper)
            || band.lower > band.upper
        {
            return Err(format!(
                "percentile band [{}, {}] must satisfy 0 <= lower <= upper <= 1",
                band.lower, band.upper
            ));
        }
        if !(self.bmi_threshold.is_finite() && self.bmi_threshold > 0.0) {
            return Err(format!("bmi_threshold must be positive, got {}", self.bmi_threshold));
        }
        for (name, (w, h)) in [
            ("cat_plot_size", self.cat_plot_size),
            ("heat_map_size", self.heat_map_size),
        ] {
            if w == 0 || h == 0 {
                return Err(format!("{name} must be non-zero, got {w}x{h}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visualizer.json");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let (_dir, path) = write_config(
            r#"{ "heat_map_output": "out/heat.png", "data_quality": "drop_rows",
                 "percentile_band": { "lower": 0.05, "upper": 0.95 } }"#,
        );
        let config = VisualizerConfig::from_json_file(&path).unwrap();

        assert_eq!(config.heat_map_output, PathBuf::from("out/heat.png"));
        assert_eq!(config.data_quality, DataQualityPolicy::DropRows);
        assert_eq!(config.percentile_band.lower, 0.05);
        assert_eq!(config.cat_plot_output, PathBuf::from("catplot.png"));
        assert_eq!(config.heat_map_size, (1200, 900));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_dir, path) = write_config(r#"{ "heatmap": "x.png" }"#);
        assert!(matches!(
            VisualizerConfig::from_json_file(&path),
            Err(VisualizerError::Config { .. })
        ));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let (_dir, path) =
            write_config(r#"{ "percentile_band": { "lower": 0.9, "upper": 0.1 } }"#);
        let err = VisualizerConfig::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("percentile band"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VisualizerConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, VisualizerConfig::default());
    }
}
