//! Risk-factor bar chart and correlation heat map for a medical examination
//! dataset.
//!
//! The pipeline loads the examination table once, derives `overweight` and
//! the good/bad `cholesterol`/`gluc` flags once, and hands the resulting
//! [`MedicalDataset`] to two independent branches:
//!
//! * [`pipeline::draw_cat_plot`] – melt the indicator columns, count, draw bars
//! * [`pipeline::draw_heat_map`] – drop bad rows, correlate, mask, draw

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod stats;

pub use config::VisualizerConfig;
pub use data::model::MedicalDataset;
pub use error::{DataQualityError, LoadError, RenderError, VisualizerError};
