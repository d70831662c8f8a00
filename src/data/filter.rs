use serde::Deserialize;

use super::model::{Column, MedicalDataset, PatientRecord};

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// The `q`-quantile (`0.0..=1.0`) of `values` with linear interpolation
/// between order statistics: position `q * (n - 1)` in the sorted values.
///
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Lower and upper quantiles kept by the outlier filter.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PercentileBand {
    pub lower: f64,
    pub upper: f64,
}

impl Default for PercentileBand {
    fn default() -> Self {
        Self {
            lower: 0.025,
            upper: 0.975,
        }
    }
}

/// Inclusive `[min, max]` range of accepted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Band of `column` in `dataset`, or `None` when the dataset is empty.
    pub fn of_column(dataset: &MedicalDataset, column: Column, band: PercentileBand) -> Option<Self> {
        let values = dataset.column(column);
        Some(Bounds {
            min: percentile(&values, band.lower)?,
            max: percentile(&values, band.upper)?,
        })
    }
}

/// Thresholds computed once from the unfiltered table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBounds {
    pub height: Bounds,
    pub weight: Bounds,
}

impl FilterBounds {
    pub fn from_dataset(dataset: &MedicalDataset, band: PercentileBand) -> Option<Self> {
        let bounds = FilterBounds {
            height: Bounds::of_column(dataset, Column::Height, band)?,
            weight: Bounds::of_column(dataset, Column::Weight, band)?,
        };
        log::debug!(
            "Height band [{}, {}], weight band [{}, {}]",
            bounds.height.min,
            bounds.height.max,
            bounds.weight.min,
            bounds.weight.max
        );
        Some(bounds)
    }

    /// Whether a record survives cleaning.
    ///
    /// A record passes when:
    /// * diastolic pressure does not exceed systolic pressure
    /// * height lies inside the height band
    /// * weight lies inside the weight band
    pub fn accepts(&self, record: &PatientRecord) -> bool {
        record.ap_lo <= record.ap_hi
            && self.height.contains(record.height)
            && self.weight.contains(record.weight)
    }
}

/// Rows kept for correlation analysis, borrowed from the derived table.
#[derive(Debug, Clone)]
pub struct CleanedRows<'a> {
    pub bounds: Option<FilterBounds>,
    pub rows: Vec<&'a PatientRecord>,
}

impl CleanedRows<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }
}

/// Return indices of records that pass `bounds`.
pub fn filtered_indices(dataset: &MedicalDataset, bounds: &FilterBounds) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| bounds.accepts(r))
        .map(|(i, _)| i)
        .collect()
}

/// Drop inverted blood-pressure readings and height/weight outliers.
pub fn clean_for_heatmap(dataset: &MedicalDataset, band: PercentileBand) -> CleanedRows<'_> {
    let Some(bounds) = FilterBounds::from_dataset(dataset, band) else {
        return CleanedRows {
            bounds: None,
            rows: Vec::new(),
        };
    };

    let rows: Vec<&PatientRecord> = filtered_indices(dataset, &bounds)
        .into_iter()
        .map(|i| &dataset.records()[i])
        .collect();

    log::info!(
        "Kept {} of {} patients for correlation",
        rows.len(),
        dataset.len()
    );
    CleanedRows {
        bounds: Some(bounds),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::{derive_features, DerivationOptions};
    use crate::data::model::{ExaminationTable, RawRecord};

    fn record(id: i64, height: f64, weight: f64, ap_hi: f64, ap_lo: f64) -> RawRecord {
        RawRecord {
            id,
            age: 20000,
            gender: 1,
            height,
            weight,
            ap_hi,
            ap_lo,
            cholesterol: 1,
            gluc: 1,
            smoke: 0,
            alco: 0,
            active: 1,
            cardio: 0,
        }
    }

    fn derive(records: Vec<RawRecord>) -> MedicalDataset {
        derive_features(ExaminationTable::new(records), &DerivationOptions::default())
            .unwrap()
            .0
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(4.0));
        assert_eq!(percentile(&values, 0.5), Some(2.5));
        // position 0.025 * 3 = 0.075
        let p = percentile(&values, 0.025).unwrap();
        assert!((p - 1.075).abs() < 1e-12);
        let p = percentile(&values, 0.975).unwrap();
        assert!((p - 3.925).abs() < 1e-12);
    }

    #[test]
    fn percentile_edge_cases() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[7.0], 0.975), Some(7.0));
        assert_eq!(percentile(&[1.0, 2.0], 1.5), None);
    }

    #[test]
    fn inverted_pressure_is_excluded_regardless_of_size() {
        let mut records: Vec<RawRecord> = (0..41)
            .map(|i| record(i, 150.0 + i as f64, 50.0 + i as f64, 120.0, 80.0))
            .collect();
        // Median height and weight, but diastolic above systolic.
        records[20].ap_hi = 120.0;
        records[20].ap_lo = 140.0;
        let ds = derive(records);

        let cleaned = clean_for_heatmap(&ds, PercentileBand::default());
        assert!(cleaned.rows.iter().all(|r| r.id != 20));
        assert!(cleaned.rows.iter().all(|r| r.ap_lo <= r.ap_hi));
    }

    #[test]
    fn band_is_computed_from_unfiltered_table() {
        // 41 evenly spaced heights: 2.5th percentile is at position 1.0.
        let records: Vec<RawRecord> = (0..41)
            .map(|i| record(i, 150.0 + i as f64, 70.0, 120.0, 80.0))
            .collect();
        let ds = derive(records);

        let cleaned = clean_for_heatmap(&ds, PercentileBand::default());
        let bounds = cleaned.bounds.unwrap();
        assert_eq!(bounds.height, Bounds { min: 151.0, max: 189.0 });
        assert_eq!(bounds.weight, Bounds { min: 70.0, max: 70.0 });

        let ids: Vec<i64> = cleaned.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..40).collect::<Vec<i64>>());
        for row in &cleaned.rows {
            assert!(bounds.height.contains(row.height));
            assert!(bounds.weight.contains(row.weight));
        }
    }

    #[test]
    fn equal_pressures_are_kept() {
        let ds = derive(vec![record(1, 170.0, 70.0, 90.0, 90.0)]);
        let cleaned = clean_for_heatmap(&ds, PercentileBand::default());
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let empty = MedicalDataset::default();
        let cleaned = clean_for_heatmap(&empty, PercentileBand::default());
        assert!(cleaned.bounds.is_none());
        assert!(cleaned.is_empty());
    }
}
