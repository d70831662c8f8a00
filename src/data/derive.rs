use serde::Deserialize;

use super::model::{ExaminationTable, MedicalDataset, PatientRecord, RawRecord};
use crate::error::DataQualityError;

/// BMI above which a patient counts as overweight.
pub const DEFAULT_BMI_THRESHOLD: f64 = 25.0;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a row whose values cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityPolicy {
    /// Stop at the first offending row.
    #[default]
    Abort,
    /// Drop offending rows, logging each one.
    DropRows,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivationOptions {
    pub bmi_threshold: f64,
    pub policy: DataQualityPolicy,
}

impl Default for DerivationOptions {
    fn default() -> Self {
        Self {
            bmi_threshold: DEFAULT_BMI_THRESHOLD,
            policy: DataQualityPolicy::Abort,
        }
    }
}

/// Outcome of a derivation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivationReport {
    /// Rows removed under [`DataQualityPolicy::DropRows`].
    pub dropped: Vec<DataQualityError>,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Body mass index from height in cm and weight in kg.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Map the ordinal scale (1 normal, 2+ raised) to good (0) / bad (1).
/// Values below 1 are outside the scale.
pub fn normalize_ordinal(value: i64) -> Option<u8> {
    match value {
        1 => Some(0),
        v if v > 1 => Some(1),
        _ => None,
    }
}

/// Derive `overweight` and normalise `cholesterol`/`gluc` for every row.
///
/// Consumes the loaded table so derivation cannot run twice on the same data.
pub fn derive_features(
    table: ExaminationTable,
    options: &DerivationOptions,
) -> Result<(MedicalDataset, DerivationReport), DataQualityError> {
    let mut report = DerivationReport::default();
    let mut records = Vec::with_capacity(table.len());

    for raw in table.records {
        match derive_record(&raw, options.bmi_threshold) {
            Ok(record) => records.push(record),
            Err(err) => match options.policy {
                DataQualityPolicy::Abort => return Err(err),
                DataQualityPolicy::DropRows => {
                    log::warn!("Dropping row: {err}");
                    report.dropped.push(err);
                }
            },
        }
    }

    log::info!(
        "Derived features for {} patients ({} dropped)",
        records.len(),
        report.dropped.len()
    );
    Ok((MedicalDataset::from_records(records), report))
}

/// Derive a single row.
pub fn derive_record(raw: &RawRecord, bmi_threshold: f64) -> Result<PatientRecord, DataQualityError> {
    positive(raw.id, "height", raw.height)?;
    positive(raw.id, "weight", raw.weight)?;

    let cholesterol = ordinal(raw.id, "cholesterol", raw.cholesterol)?;
    let gluc = ordinal(raw.id, "gluc", raw.gluc)?;

    Ok(PatientRecord {
        id: raw.id,
        age: raw.age,
        gender: raw.gender,
        height: raw.height,
        weight: raw.weight,
        ap_hi: raw.ap_hi,
        ap_lo: raw.ap_lo,
        cholesterol,
        gluc,
        smoke: flag(raw.id, "smoke", raw.smoke)?,
        alco: flag(raw.id, "alco", raw.alco)?,
        active: flag(raw.id, "active", raw.active)?,
        cardio: flag(raw.id, "cardio", raw.cardio)?,
        overweight: u8::from(bmi(raw.height, raw.weight) > bmi_threshold),
    })
}

fn positive(id: i64, field: &'static str, value: f64) -> Result<(), DataQualityError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DataQualityError::NonPositive { id, field, value })
    }
}

fn ordinal(id: i64, field: &'static str, value: i64) -> Result<u8, DataQualityError> {
    normalize_ordinal(value).ok_or(DataQualityError::OrdinalOutOfDomain { id, field, value })
}

fn flag(id: i64, field: &'static str, value: i64) -> Result<u8, DataQualityError> {
    match value {
        0 => Ok(0),
        1 => Ok(1),
        _ => Err(DataQualityError::FlagOutOfDomain { id, field, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, height: f64, weight: f64, cholesterol: i64) -> RawRecord {
        RawRecord {
            id,
            age: 18000,
            gender: 1,
            height,
            weight,
            ap_hi: 120.0,
            ap_lo: 80.0,
            cholesterol,
            gluc: 1,
            smoke: 0,
            alco: 0,
            active: 1,
            cardio: 0,
        }
    }

    #[test]
    fn overweight_boundary_is_strict() {
        // 2 m tall, so weight / 4 is the BMI.
        let weights = [99.6, 100.0, 100.4, 120.0, 72.0];
        let table = ExaminationTable::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| raw(i as i64, 200.0, w, 1))
                .collect(),
        );

        let (dataset, report) = derive_features(table, &DerivationOptions::default()).unwrap();
        let overweight: Vec<u8> = dataset.records().iter().map(|r| r.overweight).collect();
        assert_eq!(overweight, [0, 0, 1, 1, 0]);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn cholesterol_is_normalized() {
        let table = ExaminationTable::new(
            [1, 2, 3, 1, 2]
                .iter()
                .enumerate()
                .map(|(i, &c)| raw(i as i64, 170.0, 70.0, c))
                .collect(),
        );

        let (dataset, _) = derive_features(table, &DerivationOptions::default()).unwrap();
        let cholesterol: Vec<u8> = dataset.records().iter().map(|r| r.cholesterol).collect();
        assert_eq!(cholesterol, [0, 1, 1, 0, 1]);
    }

    #[test]
    fn gluc_is_normalized_and_other_columns_untouched() {
        let mut row = raw(9, 165.0, 64.0, 1);
        row.gluc = 3;
        row.gender = 2;
        let derived = derive_record(&row, DEFAULT_BMI_THRESHOLD).unwrap();
        assert_eq!(derived.gluc, 1);
        assert_eq!(derived.gender, 2);
        assert_eq!(derived.height, 165.0);
        assert_eq!(derived.weight, 64.0);
        assert_eq!(derived.active, 1);
    }

    #[test]
    fn non_positive_height_aborts_by_default() {
        let table = ExaminationTable::new(vec![raw(1, 170.0, 70.0, 1), raw(2, 0.0, 70.0, 1)]);

        let err = derive_features(table, &DerivationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            DataQualityError::NonPositive {
                id: 2,
                field: "height",
                value: 0.0
            }
        );
    }

    #[test]
    fn drop_rows_policy_removes_only_offenders() {
        let mut bad_flag = raw(4, 170.0, 70.0, 1);
        bad_flag.smoke = 2;
        let table = ExaminationTable::new(vec![
            raw(1, 170.0, 70.0, 1),
            raw(2, 170.0, -5.0, 1),
            raw(3, 170.0, 70.0, 0),
            bad_flag,
            raw(5, 170.0, 70.0, 3),
        ]);
        let options = DerivationOptions {
            policy: DataQualityPolicy::DropRows,
            ..Default::default()
        };

        let (dataset, report) = derive_features(table, &options).unwrap();
        let ids: Vec<i64> = dataset.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 5]);
        assert_eq!(report.dropped.len(), 3);
        assert!(matches!(
            report.dropped[1],
            DataQualityError::OrdinalOutOfDomain { id: 3, field: "cholesterol", value: 0 }
        ));
    }

    #[test]
    fn ordinal_domain() {
        assert_eq!(normalize_ordinal(1), Some(0));
        assert_eq!(normalize_ordinal(2), Some(1));
        assert_eq!(normalize_ordinal(3), Some(1));
        assert_eq!(normalize_ordinal(4), Some(1));
        assert_eq!(normalize_ordinal(0), None);
        assert_eq!(normalize_ordinal(-1), None);
    }
}
