use std::path::Path;

use plotters::prelude::*;

use super::{draw_error, pixel_buffer, save_png, Figure};
use crate::color::generate_palette;
use crate::data::reshape::IndicatorTable;
use crate::error::RenderError;

const CHART: &str = "categorical plot";

/// Share of a category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

/// Horizontal extent of bar `hue_idx` (of `hues`) in category slot `slot`.
/// Slot `i` is centred on `i` and the bars share [`GROUP_WIDTH`] of it.
pub fn bar_span(slot: usize, hue_idx: usize, hues: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / hues.max(1) as f64;
    let x0 = slot as f64 - GROUP_WIDTH / 2.0 + hue_idx as f64 * width;
    (x0, x0 + width)
}

/// Distinct indicator values present in the table, ascending.
fn hue_values(table: &IndicatorTable) -> Vec<u8> {
    let mut values: Vec<u8> = table.rows.iter().map(|r| r.value).collect();
    values.sort_unstable();
    values.dedup();
    values
}

// ---------------------------------------------------------------------------
// Categorical bar chart
// ---------------------------------------------------------------------------

/// Bar chart of indicator counts: one facet per `cardio` value, one slot per
/// indicator, one bar per indicator value.
pub fn draw_cat_plot(
    table: &IndicatorTable,
    path: &Path,
    size: (u32, u32),
) -> Result<Figure, RenderError> {
    if table.is_empty() {
        return Err(RenderError::Empty(CHART));
    }

    let facets = table.cardio_values();
    let indicators = table.indicators();
    let names: Vec<&str> = indicators.iter().map(|i| i.name()).collect();
    let hues = hue_values(table);
    let colors = generate_palette(hues.len());
    let y_max = table.max_total() as f64 * 1.1;
    let x_range = -0.5..(indicators.len() as f64 - 0.5);

    let mut buffer = pixel_buffer(size);
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error(CHART))?;
        let panels = root.split_evenly((1, facets.len()));

        for (facet_idx, (panel, &cardio)) in panels.iter().zip(&facets).enumerate() {
            let mut chart = ChartBuilder::on(panel)
                .margin(15)
                .caption(format!("cardio = {cardio}"), ("sans-serif", 20))
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range.clone(), 0.0..y_max)
                .map_err(draw_error(CHART))?;

            let label_for = |x: &f64| {
                let slot = x.round();
                if (x - slot).abs() > 1e-6 || slot < 0.0 {
                    return String::new();
                }
                names.get(slot as usize).map(|n| n.to_string()).unwrap_or_default()
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(names.len())
                .x_label_formatter(&label_for)
                .x_desc("variable")
                .y_desc("total")
                .draw()
                .map_err(draw_error(CHART))?;

            for (hue_idx, (&value, &color)) in hues.iter().zip(&colors).enumerate() {
                let bars: Vec<Rectangle<(f64, f64)>> = indicators
                    .iter()
                    .enumerate()
                    .filter_map(|(slot, &indicator)| {
                        let total = table.total(cardio, indicator, value);
                        if total == 0 {
                            return None;
                        }
                        let (x0, x1) = bar_span(slot, hue_idx, hues.len());
                        Some(Rectangle::new([(x0, 0.0), (x1, total as f64)], color.filled()))
                    })
                    .collect();

                chart
                    .draw_series(bars)
                    .map_err(draw_error(CHART))?
                    .label(format!("value = {value}"))
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
            }

            if facet_idx + 1 == facets.len() {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .border_style(BLACK)
                    .background_style(WHITE.mix(0.8))
                    .draw()
                    .map_err(draw_error(CHART))?;
            }
        }

        root.present().map_err(draw_error(CHART))?;
    }

    save_png(CHART, buffer, size, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Indicator;
    use crate::data::reshape::IndicatorCount;

    #[test]
    fn bars_split_the_group_evenly() {
        assert_eq!(bar_span(0, 0, 2), (-0.4, 0.0));
        assert_eq!(bar_span(0, 1, 2), (0.0, 0.4));
        let (x0, x1) = bar_span(3, 1, 2);
        assert!((x0 - 3.0).abs() < 1e-12 && (x1 - 3.4).abs() < 1e-12);
        let (x0, x1) = bar_span(1, 0, 1);
        assert!((x0 - 0.6).abs() < 1e-12 && (x1 - 1.4).abs() < 1e-12);
    }

    #[test]
    fn hues_are_sorted_and_unique() {
        let row = |cardio, value| IndicatorCount {
            cardio,
            indicator: Indicator::Smoke,
            value,
            total: 1,
        };
        let table = IndicatorTable {
            rows: vec![row(0, 1), row(0, 0), row(1, 1)],
        };
        assert_eq!(hue_values(&table), [0, 1]);
    }

    #[test]
    fn empty_table_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catplot.png");
        let err = draw_cat_plot(&IndicatorTable::default(), &path, (400, 200)).unwrap_err();
        assert!(matches!(err, RenderError::Empty(_)));
        assert!(!path.exists());
    }
}
