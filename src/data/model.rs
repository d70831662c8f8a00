use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column – every numeric column of the derived table, in output order
// ---------------------------------------------------------------------------

/// A column of the derived patient table.
///
/// The order of [`Column::ALL`] is the file order of the input, followed by
/// the derived `overweight` column. The correlation matrix uses this order on
/// both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    Age,
    Gender,
    Height,
    Weight,
    ApHi,
    ApLo,
    Cholesterol,
    Gluc,
    Smoke,
    Alco,
    Active,
    Cardio,
    Overweight,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Id,
        Column::Age,
        Column::Gender,
        Column::Height,
        Column::Weight,
        Column::ApHi,
        Column::ApLo,
        Column::Cholesterol,
        Column::Gluc,
        Column::Smoke,
        Column::Alco,
        Column::Active,
        Column::Cardio,
        Column::Overweight,
    ];

    /// Columns that must be present in the input header.
    pub const REQUIRED: [Column; 13] = [
        Column::Id,
        Column::Age,
        Column::Gender,
        Column::Height,
        Column::Weight,
        Column::ApHi,
        Column::ApLo,
        Column::Cholesterol,
        Column::Gluc,
        Column::Smoke,
        Column::Alco,
        Column::Active,
        Column::Cardio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Age => "age",
            Column::Gender => "gender",
            Column::Height => "height",
            Column::Weight => "weight",
            Column::ApHi => "ap_hi",
            Column::ApLo => "ap_lo",
            Column::Cholesterol => "cholesterol",
            Column::Gluc => "gluc",
            Column::Smoke => "smoke",
            Column::Alco => "alco",
            Column::Active => "active",
            Column::Cardio => "cardio",
            Column::Overweight => "overweight",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Indicator – the binary risk factors shown in the categorical chart
// ---------------------------------------------------------------------------

/// A binary risk-factor indicator. `0` is always good, `1` always bad
/// (except `active`, which is reported as recorded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Cholesterol,
    Gluc,
    Smoke,
    Alco,
    Active,
    Overweight,
}

impl Indicator {
    /// Melt order: the order indicators are unpivoted in.
    pub const ALL: [Indicator; 6] = [
        Indicator::Cholesterol,
        Indicator::Gluc,
        Indicator::Smoke,
        Indicator::Alco,
        Indicator::Active,
        Indicator::Overweight,
    ];

    pub fn name(self) -> &'static str {
        self.column().name()
    }

    pub fn column(self) -> Column {
        match self {
            Indicator::Cholesterol => Column::Cholesterol,
            Indicator::Gluc => Column::Gluc,
            Indicator::Smoke => Column::Smoke,
            Indicator::Alco => Column::Alco,
            Indicator::Active => Column::Active,
            Indicator::Overweight => Column::Overweight,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one line of the input file, before derivation
// ---------------------------------------------------------------------------

/// One patient exactly as read from the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    /// Age in days.
    pub age: i64,
    pub gender: i64,
    /// Height in cm.
    pub height: f64,
    /// Weight in kg.
    pub weight: f64,
    pub ap_hi: f64,
    pub ap_lo: f64,
    /// Ordinal 1 (normal), 2 (above normal), 3 (well above normal).
    pub cholesterol: i64,
    /// Same scale as `cholesterol`.
    pub gluc: i64,
    pub smoke: i64,
    pub alco: i64,
    pub active: i64,
    pub cardio: i64,
}

/// The loaded table. Its only consumer is the feature deriver.
#[derive(Debug, Clone, Default)]
pub struct ExaminationTable {
    pub records: Vec<RawRecord>,
}

impl ExaminationTable {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PatientRecord – one row after derivation
// ---------------------------------------------------------------------------

/// A patient with derived features. Every flag field is 0 or 1.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub id: i64,
    pub age: i64,
    pub gender: i64,
    pub height: f64,
    pub weight: f64,
    pub ap_hi: f64,
    pub ap_lo: f64,
    pub cholesterol: u8,
    pub gluc: u8,
    pub smoke: u8,
    pub alco: u8,
    pub active: u8,
    pub cardio: u8,
    pub overweight: u8,
}

impl PatientRecord {
    /// Numeric value of `column` for correlation.
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Id => self.id as f64,
            Column::Age => self.age as f64,
            Column::Gender => self.gender as f64,
            Column::Height => self.height,
            Column::Weight => self.weight,
            Column::ApHi => self.ap_hi,
            Column::ApLo => self.ap_lo,
            Column::Cholesterol => f64::from(self.cholesterol),
            Column::Gluc => f64::from(self.gluc),
            Column::Smoke => f64::from(self.smoke),
            Column::Alco => f64::from(self.alco),
            Column::Active => f64::from(self.active),
            Column::Cardio => f64::from(self.cardio),
            Column::Overweight => f64::from(self.overweight),
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> u8 {
        match indicator {
            Indicator::Cholesterol => self.cholesterol,
            Indicator::Gluc => self.gluc,
            Indicator::Smoke => self.smoke,
            Indicator::Alco => self.alco,
            Indicator::Active => self.active,
            Indicator::Overweight => self.overweight,
        }
    }
}

// ---------------------------------------------------------------------------
// MedicalDataset – the derived table shared by both chart branches
// ---------------------------------------------------------------------------

/// The derived patient table. Only [`derive_features`](crate::data::derive::derive_features)
/// constructs it, so holding one means derivation ran exactly once.
#[derive(Debug, Clone, Default)]
pub struct MedicalDataset {
    records: Vec<PatientRecord>,
}

impl MedicalDataset {
    pub(crate) fn from_records(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.value(column)).collect()
    }

    /// Number of patients with the given `cardio` outcome.
    pub fn cardio_count(&self, cardio: u8) -> usize {
        self.records.iter().filter(|r| r.cardio == cardio).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_columns_follow_file_order_then_derived() {
        assert_eq!(Column::ALL[..13], Column::REQUIRED);
        assert_eq!(Column::ALL[13], Column::Overweight);
        assert_eq!(Column::ApLo.to_string(), "ap_lo");
    }

    #[test]
    fn indicator_names_match_their_columns() {
        let names: Vec<&str> = Indicator::ALL.iter().map(|i| i.name()).collect();
        assert_eq!(
            names,
            ["cholesterol", "gluc", "smoke", "alco", "active", "overweight"]
        );
    }
}
