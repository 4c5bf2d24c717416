//! Loading and saving the persisted record file.
//!
//! The file is only touched inside [`load`] and [`save`]; no handle outlives
//! either call.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::instrument;

use crate::codec;
use crate::error::{Error, Result};
use crate::roster::Roster;

/// Where the loaded records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The file existed and was read
    File,
    /// No file at the path; the roster starts empty
    Missing,
}

/// Outcome of [`load`]
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub roster: Roster,
    /// Records parsed and kept
    pub loaded: usize,
    /// Non-blank lines that failed to parse
    pub skipped: usize,
    pub source: LoadSource,
}

/// Read records from `path` into a roster holding at most `capacity` records.
///
/// A missing file is not an error. Malformed lines are counted in
/// [`LoadReport::skipped`] and otherwise ignored. Reading stops as soon as the
/// roster is full.
#[instrument(skip_all, fields(path = %path.display(), capacity = capacity))]
pub fn load(path: &Path, capacity: usize) -> Result<LoadReport> {
    let mut roster = Roster::with_capacity(capacity);

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No record file, starting empty");
            return Ok(LoadReport { roster, loaded: 0, skipped: 0, source: LoadSource::Missing });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0;
    let mut skipped = 0;
    loop {
        if roster.is_full() {
            tracing::debug!("Capacity reached, ignoring the rest of the file");
            break;
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(|e| Error::io(path, e))? == 0 {
            break;
        }
        line_no += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::debug!(line = line_no, "Skipping record that is not valid UTF-8");
            skipped += 1;
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        match codec::decode(line) {
            Ok(student) => roster.push(student)?,
            Err(e) => {
                tracing::debug!(line = line_no, error = %e, "Skipping malformed record");
                skipped += 1;
            }
        }
    }

    let loaded = roster.len();
    tracing::info!(loaded, skipped, "Records loaded");
    Ok(LoadReport { roster, loaded, skipped, source: LoadSource::File })
}

/// Replace the contents of `path` with every record in `roster`.
///
/// Returns the number of records written.
#[instrument(skip_all, fields(path = %path.display(), records = roster.len()))]
pub fn save(path: &Path, roster: &Roster) -> Result<usize> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for student in roster {
        writeln!(writer, "{}", codec::encode(student)).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    tracing::info!("Records saved");
    Ok(roster.len())
}
