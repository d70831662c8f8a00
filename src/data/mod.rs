/// Data layer: core types, loading, derivation, reshaping and filtering.
///
/// Architecture:
/// ```text
///  medical_examination.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ExaminationTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  overweight, good/bad flags → MedicalDataset
///   └──────────┘
///        │
///        ├────────────────────┐
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │ reshape   │        │  filter   │  pressure + percentile bands
///   └──────────┘        └──────────┘
///   IndicatorTable       CleanedRows → stats
/// ```
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reshape;
