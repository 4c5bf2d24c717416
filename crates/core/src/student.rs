//! The student record and its field limits.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest accepted name or course, in characters.
pub const MAX_TEXT_LEN: usize = 49;

/// One student's academic record.
///
/// Records are plain values with no identity beyond their fields. The roll
/// number is the lookup key, but nothing here enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub roll: i32,
    pub course: String,
    pub year: i32,
    pub cgpa: f64,
}

impl Student {
    pub fn new(name: impl Into<String>, roll: i32, course: impl Into<String>, year: i32, cgpa: f64) -> Self {
        Self { name: name.into(), roll, course: course.into(), year, cgpa }
    }

    /// Check both text fields against [`validate_text`].
    pub fn validate(&self) -> Result<()> {
        validate_text("name", &self.name)?;
        validate_text("course", &self.course)?;
        Ok(())
    }

    /// The CGPA as it will be persisted (two decimal places).
    pub fn cgpa_rounded(&self) -> f64 {
        (self.cgpa * 100.0).round() / 100.0
    }
}

/// Validate a free-text field: non-empty and at most [`MAX_TEXT_LEN`] characters.
///
/// Commas are accepted even though the persisted format does not escape them.
pub fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{field} must not be empty")));
    }

    let len = value.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(Error::validation(format!(
            "{field} is {len} characters, the limit is {MAX_TEXT_LEN}"
        )));
    }

    Ok(())
}
