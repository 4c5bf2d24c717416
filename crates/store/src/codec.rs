//! Line format of the persisted record file.
//!
//! One record per line, `name,roll,course,year,cgpa`, comma separated, CGPA
//! written with two decimals. Values are never quoted or escaped: a name or
//! course containing a comma produces a line that no longer decodes.

use roster_core::{MAX_TEXT_LEN, Student};
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

pub const DELIMITER: char = ',';

/// Why a line could not be decoded into a [`Student`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("{field} is empty")]
    EmptyText { field: &'static str },

    #[error("{field} exceeds 49 characters")]
    TextTooLong { field: &'static str },

    #[error("{field} is not an integer: {source}")]
    Int {
        field: &'static str,
        #[source]
        source: ParseIntError,
    },

    #[error("cgpa is not a number: {0}")]
    Float(#[from] ParseFloatError),
}

/// Render a record as one persisted line, without the terminator.
pub fn encode(student: &Student) -> String {
    format!(
        "{name}{d}{roll}{d}{course}{d}{year}{d}{cgpa:.2}",
        name = student.name,
        roll = student.roll,
        course = student.course,
        year = student.year,
        cgpa = student.cgpa,
        d = DELIMITER,
    )
}

/// Parse one persisted line.
pub fn decode(line: &str) -> Result<Student, DecodeError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(DELIMITER).collect();
    let [name, roll, course, year, cgpa] = fields.as_slice() else {
        return Err(DecodeError::FieldCount(fields.len()));
    };

    Ok(Student {
        name: text("name", name)?,
        roll: int("roll", roll)?,
        course: text("course", course)?,
        year: int("year", year)?,
        cgpa: cgpa.trim().parse::<f64>()?,
    })
}

fn text(field: &'static str, raw: &str) -> Result<String, DecodeError> {
    let value = raw.trim_start();
    if value.is_empty() {
        return Err(DecodeError::EmptyText { field });
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DecodeError::TextTooLong { field });
    }
    Ok(value.to_string())
}

fn int(field: &'static str, raw: &str) -> Result<i32, DecodeError> {
    raw.trim().parse().map_err(|source| DecodeError::Int { field, source })
}
