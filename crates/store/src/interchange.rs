//! Spreadsheet-friendly import and export.
//!
//! Unlike the persisted file, exported CSV carries a header row and quotes the
//! text fields. Imports merge into an existing roster and skip roll numbers it
//! already holds. Rows whose name or course contains the record file's
//! delimiter are rejected, since the record file could not load them back.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::instrument;

use roster_core::{Student, validate_text};

use crate::codec::DELIMITER;
use crate::error::{Error, Result};
use crate::roster::Roster;

pub const CSV_HEADER: &str = "Name,RollNo,Course,Year,CGPA";

/// Outcome of [`import_csv`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// Rows whose roll number was already present
    pub duplicates: usize,
    /// Rows that did not parse
    pub invalid: usize,
    /// Valid rows dropped because the roster was full
    pub rejected_capacity: usize,
}

/// Write `roster` as CSV with a header row and quoted text fields.
#[instrument(skip_all, fields(path = %path.display(), records = roster.len()))]
pub fn export_csv(path: &Path, roster: &Roster) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{CSV_HEADER}").map_err(|e| Error::io(path, e))?;
    for s in roster {
        writeln!(
            writer,
            "{},{},{},{},{:.2}",
            quote(&s.name),
            s.roll,
            quote(&s.course),
            s.year,
            s.cgpa
        )
        .map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    tracing::info!("CSV exported");
    Ok(())
}

/// Write `roster` as a pretty-printed JSON array.
#[instrument(skip_all, fields(path = %path.display(), records = roster.len()))]
pub fn export_json(path: &Path, roster: &Roster) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, roster.records())?;
    writeln!(writer).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))?;

    tracing::info!("JSON exported");
    Ok(())
}

/// Merge the rows of a CSV file into `roster`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn import_csv(path: &Path, roster: &mut Roster) -> Result<ImportReport> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut report = ImportReport::default();
    let mut seen: HashSet<i32> = roster.iter().map(|s| s.roll).collect();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_row(line);
        if index == 0 && row.is_none() && line.to_lowercase().contains("name") {
            tracing::debug!(header = line, "Skipping header row");
            continue;
        }

        let Some(student) = row else {
            tracing::debug!(line = index + 1, "Skipping invalid row");
            report.invalid += 1;
            continue;
        };

        if !seen.insert(student.roll) {
            report.duplicates += 1;
            continue;
        }

        match roster.push(student) {
            Ok(()) => report.imported += 1,
            Err(Error::CapacityExceeded { .. }) => report.rejected_capacity += 1,
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        imported = report.imported,
        duplicates = report.duplicates,
        invalid = report.invalid,
        rejected_capacity = report.rejected_capacity,
        "CSV imported"
    );
    Ok(report)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn parse_row(line: &str) -> Option<Student> {
    let fields = split_fields(line);
    if fields.len() < 5 {
        return None;
    }

    let name = fields[0].trim();
    let course = fields[2].trim();
    validate_text("name", name).ok()?;
    validate_text("course", course).ok()?;
    if name.contains(DELIMITER) || course.contains(DELIMITER) {
        return None;
    }

    Some(Student {
        name: name.to_string(),
        roll: fields[1].trim().parse().ok()?,
        course: course.to_string(),
        year: fields[3].trim().parse().ok()?,
        cgpa: fields[4].trim().parse().ok()?,
    })
}

/// Split a CSV line on commas outside double quotes, unquoting as it goes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
