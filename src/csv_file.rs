//! Reading and writing the variables CSV.
//!
//! The export artifact has the header `Name,Value,Scope,Visibility` followed
//! by one row per variable. On the way back in, the first row is always
//! treated as a header and dropped, whatever it contains.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::constants::csv::REQUIRED_COLUMNS;
use crate::errors::MigrateError;
use crate::models::VariableRecord;

/// One data row of a sync input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingRow {
    Variable(VariableRecord),
    /// A row with fewer than four columns.
    Malformed { line: u64, fields: Vec<String> },
}

/// Write `records` with a header row, in the given order.
///
/// Returns the number of data rows written.
pub fn write_variables(path: &Path, records: &[VariableRecord]) -> Result<usize, MigrateError> {
    let file = File::create(path).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| MigrateError::csv(path, e))?;
    }
    if records.is_empty() {
        writer
            .write_record(crate::constants::csv::HEADER)
            .map_err(|e| MigrateError::csv(path, e))?;
    }

    writer.flush().map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(records.len())
}

/// Read every data row of a mapping file, skipping its first row.
///
/// Rows may have any number of columns; short ones come back as
/// [`MappingRow::Malformed`] and extra columns are ignored.
pub fn read_mapping(path: &Path) -> Result<Vec<MappingRow>, MigrateError> {
    let file = File::open(path).map_err(|source| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| MigrateError::csv(path, e))?;
        rows.push(parse_row(&record));
    }
    Ok(rows)
}

fn parse_row(record: &StringRecord) -> MappingRow {
    if record.len() < REQUIRED_COLUMNS {
        return MappingRow::Malformed {
            line: record.position().map(|p| p.line()).unwrap_or_default(),
            fields: record.iter().map(str::to_string).collect(),
        };
    }
    MappingRow::Variable(VariableRecord::new(
        &record[0],
        &record[1],
        &record[2],
        &record[3],
    ))
}
