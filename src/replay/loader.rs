//! CSV import and export of update streams
//!
//! The file format is a header line naming the columns
//! `seq, bid_px, bid_sz, ask_px, ask_sz` (any order, extra columns ignored),
//! followed by one update per row with as many fields as the header. Lines
//! starting with `#` and blank or whitespace-only lines are skipped.

use super::error::ReplayError;
use crate::book::L1Update;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Rough size of one serialized row, used to pre-size the output vector
const APPROX_BYTES_PER_ROW: u64 = 48;

/// Load every update from a CSV file, in file order.
///
/// Any malformed row aborts the load with an error that names its position.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<L1Update>, ReplayError> {
    let path = path.as_ref();
    let io_error = |source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let bytes = file.metadata().map_err(io_error)?.len();
    let capacity = (bytes / APPROX_BYTES_PER_ROW) as usize;

    let updates = read_updates(BufReader::new(file), capacity)?;
    info!("Loaded {} updates from {}", updates.len(), path.display());
    Ok(updates)
}

/// Load updates from any reader holding CSV text
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<L1Update>, ReplayError> {
    read_updates(reader, 0)
}

fn read_updates<R: Read>(reader: R, capacity: usize) -> Result<Vec<L1Update>, ReplayError> {
    // Flexible so whitespace-only lines reach us as one empty field; row
    // width is checked below instead.
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut updates = Vec::with_capacity(capacity);
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(ReplayError::RowLength {
                line: record.position().map_or(0, |position| position.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        updates.push(record.deserialize::<L1Update>(Some(&headers))?);
    }
    updates.shrink_to_fit();

    debug!("Parsed {} update rows", updates.len());
    Ok(updates)
}

/// Write updates as CSV with a header line, creating parent directories.
pub fn write_csv<P: AsRef<Path>>(path: P, updates: &[L1Update]) -> Result<(), ReplayError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReplayError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for update in updates {
        writer.serialize(update)?;
    }
    writer.flush().map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} updates to {}", updates.len(), path.display());
    Ok(())
}
