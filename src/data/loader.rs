use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::model::{Column, ExaminationTable, RawRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the examination table from a delimited file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma separated
/// * `.tsv` / `.tab` – tab separated
///
/// The header must name every column in [`Column::REQUIRED`]; extra columns
/// are ignored.
pub fn load_file(path: &Path) -> Result<ExaminationTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "tsv" | "tab" => b'\t',
        "csv" => b',',
        other => {
            return Err(LoadError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: other.to_string(),
            })
        }
    };

    let table = load_delimited(path, delimiter)?;
    log::info!("Loaded {} patient rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Read every data line of `path` into a [`RawRecord`].
pub fn load_delimited(path: &Path, delimiter: u8) -> Result<ExaminationTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Header {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    check_schema(path, &headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let record = result.map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            line: row_no + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(ExaminationTable::new(records))
}

/// Fail with the first required column the header does not name.
fn check_schema(path: &Path, headers: &StringRecord) -> Result<(), LoadError> {
    for column in Column::REQUIRED {
        if !headers.iter().any(|h| h == column.name()) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.name(),
            });
        }
    }
    Ok(())
}
