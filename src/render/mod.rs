/// Rendering layer: draws the two charts into an in-memory bitmap and writes
/// them out as PNG.
///
/// ```text
///   IndicatorTable ──► catplot::draw_cat_plot ──┐
///                                               ├──► Figure ──► .png
///   CorrelationMatrix + TriangularMask          │
///                  └──► heatmap::draw_heat_map ─┘
/// ```
pub mod catplot;
pub mod heatmap;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::RenderError;

pub use catplot::draw_cat_plot;
pub use heatmap::draw_heat_map;

// ---------------------------------------------------------------------------
// Figure – handle to a rendered chart
// ---------------------------------------------------------------------------

/// A rendered chart: the pixels that were written and where they went.
#[derive(Debug, Clone)]
pub struct Figure {
    pub path: PathBuf,
    pub image: RgbImage,
}

impl Figure {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Blank RGB buffer for a `width` x `height` bitmap.
pub(crate) fn pixel_buffer((width, height): (u32, u32)) -> Vec<u8> {
    vec![0; width as usize * height as usize * 3]
}

/// Wrap a drawn buffer and write it to `path`, replacing any existing file.
pub(crate) fn save_png(
    chart: &'static str,
    buffer: Vec<u8>,
    (width, height): (u32, u32),
    path: &Path,
) -> Result<Figure, RenderError> {
    let image = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Draw {
        chart,
        message: format!("pixel buffer does not match {width}x{height}"),
    })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("Wrote {chart} to {}", path.display());
    Ok(Figure {
        path: path.to_path_buf(),
        image,
    })
}

/// Map a plotters error into a [`RenderError`] for `chart`.
pub(crate) fn draw_error<E: Display>(chart: &'static str) -> impl Fn(E) -> RenderError {
    move |e| RenderError::Draw {
        chart,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_matches_dimensions() {
        assert_eq!(pixel_buffer((4, 3)).len(), 36);
    }

    #[test]
    fn save_png_overwrites_and_returns_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        std::fs::write(&path, b"stale").unwrap();

        let figure = save_png("test chart", pixel_buffer((8, 6)), (8, 6), &path).unwrap();
        assert_eq!((figure.width(), figure.height()), (8, 6));
        let reread = image::open(&path).unwrap();
        assert_eq!(reread.width(), 8);
    }

    #[test]
    fn save_png_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/chart.png");
        let err = save_png("test chart", pixel_buffer((2, 2)), (2, 2), &path).unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }));
    }

    #[test]
    fn mismatched_buffer_is_a_draw_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png("test chart", vec![0; 5], (2, 2), &dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, RenderError::Draw { .. }));
    }
}
