use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_error, pixel_buffer, save_png, Figure};
use crate::color::{text_color_on, DivergingMap};
use crate::error::RenderError;
use crate::stats::{CorrelationMatrix, TriangularMask};

const CHART: &str = "heat map";

const LABEL_AREA: i32 = 110;
const TOP_MARGIN: i32 = 30;
const COLORBAR_AREA: i32 = 110;
const COLORBAR_WIDTH: i32 = 20;
const COLORBAR_STEPS: i32 = 100;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Pixel geometry of the square grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub left: i32,
    pub top: i32,
    pub cell: i32,
    pub cells: usize,
}

impl GridLayout {
    /// Largest square cells that fit `cells` x `cells` into the canvas,
    /// leaving room for labels and the colour bar.
    pub fn fit(cells: usize, (width, height): (u32, u32)) -> Self {
        let avail_w = width as i32 - LABEL_AREA - COLORBAR_AREA;
        let avail_h = height as i32 - LABEL_AREA - TOP_MARGIN;
        let n = cells.max(1) as i32;
        let cell = (avail_w.min(avail_h) / n).max(1);
        Self {
            left: LABEL_AREA,
            top: TOP_MARGIN,
            cell,
            cells,
        }
    }

    pub fn side(&self) -> i32 {
        self.cell * self.cells as i32
    }

    /// Top-left and bottom-right corners of cell (row, col).
    pub fn cell_rect(&self, row: usize, col: usize) -> [(i32, i32); 2] {
        let x0 = self.left + col as i32 * self.cell;
        let y0 = self.top + row as i32 * self.cell;
        [(x0, y0), (x0 + self.cell, y0 + self.cell)]
    }

    pub fn center(&self, row: usize, col: usize) -> (i32, i32) {
        let [(x0, y0), (x1, y1)] = self.cell_rect(row, col);
        ((x0 + x1) / 2, (y0 + y1) / 2)
    }
}

/// One-decimal annotation, or nothing for an undefined correlation.
pub fn annotation(value: f64) -> Option<String> {
    value.is_finite().then(|| format!("{value:.1}"))
}

/// Largest absolute value among the cells that will be drawn.
pub fn display_limit(matrix: &CorrelationMatrix, mask: &TriangularMask) -> f64 {
    let n = matrix.size();
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| !mask.hides(i, j))
        .map(|(i, j)| matrix.get(i, j))
        .filter(|v| v.is_finite())
        .fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

// ---------------------------------------------------------------------------
// Heat map
// ---------------------------------------------------------------------------

/// Annotated heat map of the lower triangle of `matrix`.
///
/// Cells hidden by `mask` or holding NaN are left blank.
pub fn draw_heat_map(
    matrix: &CorrelationMatrix,
    mask: &TriangularMask,
    path: &Path,
    size: (u32, u32),
) -> Result<Figure, RenderError> {
    let n = matrix.size();
    if n == 0 {
        return Err(RenderError::Empty(CHART));
    }
    if mask.size() != n {
        return Err(RenderError::Draw {
            chart: CHART,
            message: format!("mask is {0}x{0} but matrix is {n}x{n}", mask.size()),
        });
    }

    let layout = GridLayout::fit(n, size);
    let colors = DivergingMap::centered(display_limit(matrix, mask));
    let font_size = (layout.cell / 3).clamp(8, 16);

    let mut buffer = pixel_buffer(size);
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error(CHART))?;

        for i in 0..n {
            for j in 0..n {
                let value = matrix.get(i, j);
                if mask.hides(i, j) || value.is_nan() {
                    continue;
                }
                let fill = colors.color_for(value);
                let rect = layout.cell_rect(i, j);
                root.draw(&Rectangle::new(rect, fill.filled()))
                    .map_err(draw_error(CHART))?;
                root.draw(&Rectangle::new(rect, WHITE.stroke_width(1)))
                    .map_err(draw_error(CHART))?;

                if let Some(text) = annotation(value) {
                    let style = ("sans-serif", font_size)
                        .into_font()
                        .color(&text_color_on(fill))
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    root.draw(&Text::new(text, layout.center(i, j), style))
                        .map_err(draw_error(CHART))?;
                }
            }
        }

        draw_axis_labels(&root, matrix, &layout)?;
        draw_colorbar(&root, &colors, &layout)?;

        root.present().map_err(draw_error(CHART))?;
    }

    save_png(CHART, buffer, size, path)
}

fn draw_axis_labels(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    matrix: &CorrelationMatrix,
    layout: &GridLayout,
) -> Result<(), RenderError> {
    let row_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = ("sans-serif", 14)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK);
    let bottom = layout.top + layout.side();

    for (i, column) in matrix.columns.iter().enumerate() {
        let (_, y) = layout.center(i, 0);
        root.draw(&Text::new(column.name(), (layout.left - 6, y), row_style.clone()))
            .map_err(draw_error(CHART))?;

        let (x, _) = layout.center(0, i);
        root.draw(&Text::new(column.name(), (x + 7, bottom + 6), col_style.clone()))
            .map_err(draw_error(CHART))?;
    }
    Ok(())
}

/// Vertical colour bar at half the grid height, centred beside it.
fn draw_colorbar(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    colors: &DivergingMap,
    layout: &GridLayout,
) -> Result<(), RenderError> {
    let height = (layout.side() / 2).max(COLORBAR_STEPS);
    let x0 = layout.left + layout.side() + 30;
    let y0 = layout.top + (layout.side() - height) / 2;
    let limit = colors.limit();

    for step in 0..COLORBAR_STEPS {
        let top = y0 + step * height / COLORBAR_STEPS;
        let bottom = y0 + (step + 1) * height / COLORBAR_STEPS;
        let value = limit - 2.0 * limit * (f64::from(step) + 0.5) / f64::from(COLORBAR_STEPS);
        root.draw(&Rectangle::new(
            [(x0, top), (x0 + COLORBAR_WIDTH, bottom)],
            colors.color_for(value).filled(),
        ))
        .map_err(draw_error(CHART))?;
    }

    let tick_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for tick in 0..=4 {
        let value = limit - limit * f64::from(tick) / 2.0;
        let y = y0 + tick * height / 4;
        root.draw(&Text::new(
            format!("{value:.2}"),
            (x0 + COLORBAR_WIDTH + 6, y),
            tick_style.clone(),
        ))
        .map_err(draw_error(CHART))?;
    }
    Ok(())
}
