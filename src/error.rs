use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failure to turn the input file into a [`MedicalDataset`](crate::data::model::MedicalDataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension '.{extension}' for {}", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("cannot read header of {}: {source}", .path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}, data line {line}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// A row whose values make the derived features meaningless.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataQualityError {
    #[error("patient {id}: {field} must be a positive number, got {value}")]
    NonPositive {
        id: i64,
        field: &'static str,
        value: f64,
    },

    #[error("patient {id}: {field} must be 1 or above, got {value}")]
    OrdinalOutOfDomain {
        id: i64,
        field: &'static str,
        value: i64,
    },

    #[error("patient {id}: {field} must be 0 or 1, got {value}")]
    FlagOutOfDomain {
        id: i64,
        field: &'static str,
        value: i64,
    },
}

/// Failure while drawing a chart or writing its image file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing {chart} failed: {message}")]
    Draw { chart: &'static str, message: String },

    #[error("nothing to draw for {0}")]
    Empty(&'static str),

    #[error("writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Top-level error for a whole visualizer run.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    DataQuality(#[from] DataQualityError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("reading config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T, E = VisualizerError> = std::result::Result<T, E>;
