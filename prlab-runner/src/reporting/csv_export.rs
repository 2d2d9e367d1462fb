//! Combined table CSV export and re-import.
//!
//! The header is always written, so an empty table produces a header-only
//! file. Missing metrics are written as empty fields and read back as `None`.

use super::ReportError;
use prlab_core::{CombinedTable, MergedRow};
use std::io::{Read, Write};
use std::path::Path;

pub const CSV_HEADER: [&str; 3] = ["Date", "GHI", "PR"];

/// Write `table` as CSV to any writer.
pub fn write_combined<W: Write>(writer: W, table: &CombinedTable) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for row in table {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_combined_csv(path: &Path, table: &CombinedTable) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_combined(file, table).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a combined CSV from any reader.
pub fn read_combined<R: Read>(reader: R) -> Result<CombinedTable, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let rows = rdr
        .deserialize::<MergedRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CombinedTable::from_rows(rows))
}

pub fn read_combined_csv(path: &Path) -> Result<CombinedTable, ReportError> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_combined(file).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
