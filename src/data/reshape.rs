use std::collections::BTreeMap;

use super::model::{Indicator, MedicalDataset};

// ---------------------------------------------------------------------------
// Long-form rows
// ---------------------------------------------------------------------------

/// One (patient, indicator) pair after unpivoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorObservation {
    pub cardio: u8,
    pub indicator: Indicator,
    pub value: u8,
}

/// Number of observations sharing a (cardio, indicator, value) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorCount {
    pub cardio: u8,
    pub indicator: Indicator,
    pub value: u8,
    pub total: usize,
}

/// The aggregated long table feeding the categorical chart.
///
/// Rows are sorted by cardio, then indicator name, then value. Keys with no
/// observations are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    pub rows: Vec<IndicatorCount>,
}

impl IndicatorTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct cardio values present, ascending.
    pub fn cardio_values(&self) -> Vec<u8> {
        let mut values: Vec<u8> = self.rows.iter().map(|r| r.cardio).collect();
        values.dedup();
        values
    }

    /// Distinct indicators present, in name order.
    pub fn indicators(&self) -> Vec<Indicator> {
        let mut indicators: Vec<Indicator> = Vec::new();
        for row in &self.rows {
            if !indicators.contains(&row.indicator) {
                indicators.push(row.indicator);
            }
        }
        indicators.sort_by_key(|i| i.name());
        indicators
    }

    /// Count for one key, 0 when the key was not observed.
    pub fn total(&self, cardio: u8, indicator: Indicator, value: u8) -> usize {
        self.rows
            .iter()
            .find(|r| r.cardio == cardio && r.indicator == indicator && r.value == value)
            .map_or(0, |r| r.total)
    }

    /// Largest count in the table.
    pub fn max_total(&self) -> usize {
        self.rows.iter().map(|r| r.total).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Melt + group-count
// ---------------------------------------------------------------------------

/// Unpivot the indicator columns keyed by `cardio`.
///
/// Output is indicator-major: every patient's `cholesterol`, then every
/// patient's `gluc`, and so on, in [`Indicator::ALL`] order.
pub fn melt(dataset: &MedicalDataset) -> Vec<IndicatorObservation> {
    Indicator::ALL
        .iter()
        .flat_map(|&indicator| {
            dataset.records().iter().map(move |r| IndicatorObservation {
                cardio: r.cardio,
                indicator,
                value: r.indicator(indicator),
            })
        })
        .collect()
}

/// Count observations per (cardio, indicator, value).
pub fn count_by_group(observations: &[IndicatorObservation]) -> IndicatorTable {
    let mut counts: BTreeMap<(u8, &'static str, u8), (Indicator, usize)> = BTreeMap::new();
    for obs in observations {
        counts
            .entry((obs.cardio, obs.indicator.name(), obs.value))
            .or_insert((obs.indicator, 0))
            .1 += 1;
    }

    let rows = counts
        .into_iter()
        .map(|((cardio, _, value), (indicator, total))| IndicatorCount {
            cardio,
            indicator,
            value,
            total,
        })
        .collect();

    IndicatorTable { rows }
}

/// Melt then count: the full categorical reshape.
pub fn indicator_table(dataset: &MedicalDataset) -> IndicatorTable {
    let table = count_by_group(&melt(dataset));
    log::debug!("Indicator table has {} rows", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::{derive_features, DerivationOptions};
    use crate::data::model::{ExaminationTable, RawRecord};

    fn dataset(rows: &[(i64, i64, i64)]) -> MedicalDataset {
        // (cardio, cholesterol, smoke)
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(cardio, cholesterol, smoke))| RawRecord {
                id: i as i64,
                age: 20000,
                gender: 1,
                height: 170.0,
                weight: 60.0,
                ap_hi: 120.0,
                ap_lo: 80.0,
                cholesterol,
                gluc: 1,
                smoke,
                alco: 0,
                active: 1,
                cardio,
            })
            .collect();
        derive_features(ExaminationTable::new(records), &DerivationOptions::default())
            .unwrap()
            .0
    }

    #[test]
    fn melt_emits_one_row_per_patient_and_indicator() {
        let ds = dataset(&[(0, 1, 0), (1, 3, 1), (1, 2, 0)]);
        let long = melt(&ds);
        assert_eq!(long.len(), 3 * Indicator::ALL.len());
        assert_eq!(
            long[1],
            IndicatorObservation {
                cardio: 1,
                indicator: Indicator::Cholesterol,
                value: 1
            }
        );
        assert_eq!(long[3].indicator, Indicator::Gluc);
    }

    #[test]
    fn counts_are_sorted_and_omit_empty_keys() {
        let ds = dataset(&[(0, 1, 0), (1, 3, 1), (1, 2, 0)]);
        let table = indicator_table(&ds);

        let keys: Vec<(u8, &str, u8)> = table
            .rows
            .iter()
            .map(|r| (r.cardio, r.indicator.name(), r.value))
            .collect();
        assert_eq!(
            keys,
            [
                (0, "active", 1),
                (0, "alco", 0),
                (0, "cholesterol", 0),
                (0, "gluc", 0),
                (0, "overweight", 0),
                (0, "smoke", 0),
                (1, "active", 1),
                (1, "alco", 0),
                (1, "cholesterol", 1),
                (1, "gluc", 0),
                (1, "overweight", 0),
                (1, "smoke", 0),
                (1, "smoke", 1),
            ]
        );
        assert_eq!(table.total(1, Indicator::Cholesterol, 1), 2);
        assert_eq!(table.total(0, Indicator::Cholesterol, 1), 0);
        assert_eq!(table.cardio_values(), [0, 1]);
        assert_eq!(table.max_total(), 2);
    }

    #[test]
    fn totals_conserve_patients_per_cardio() {
        let ds = dataset(&[(0, 1, 0), (0, 2, 1), (1, 3, 1), (1, 1, 0), (1, 2, 1)]);
        let table = indicator_table(&ds);

        for cardio in [0, 1] {
            for indicator in Indicator::ALL {
                let sum: usize = table
                    .rows
                    .iter()
                    .filter(|r| r.cardio == cardio && r.indicator == indicator)
                    .map(|r| r.total)
                    .sum();
                assert_eq!(sum, ds.cardio_count(cardio), "{cardio} {indicator}");
            }
        }
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        let table = indicator_table(&MedicalDataset::default());
        assert!(table.is_empty());
        assert!(table.indicators().is_empty());
    }
}
