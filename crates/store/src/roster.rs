//! The bounded, ordered in-memory store of student records.

use roster_core::Student;

use crate::error::{Error, Result};

pub use roster_core::DEFAULT_CAPACITY;

/// An ordered, capacity-bounded sequence of [`Student`] records.
///
/// Insertion order is preserved; removal shifts later records left. Roll
/// numbers are looked up by first match and are not required to be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    records: Vec<Student>,
    capacity: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::new(), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn records(&self) -> &[Student] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.records.iter()
    }

    /// Append a record. Fails without touching the roster when it is full.
    pub fn push(&mut self, student: Student) -> Result<()> {
        if self.is_full() {
            return Err(Error::capacity_exceeded(self.capacity));
        }
        tracing::debug!(roll = student.roll, len = self.records.len() + 1, "Record added");
        self.records.push(student);
        Ok(())
    }

    /// First record with the given roll number.
    pub fn find(&self, roll: i32) -> Option<&Student> {
        self.records.iter().find(|s| s.roll == roll)
    }

    pub fn contains_roll(&self, roll: i32) -> bool {
        self.find(roll).is_some()
    }

    /// Remove the first record with the given roll number.
    pub fn remove(&mut self, roll: i32) -> Option<Student> {
        let index = self.records.iter().position(|s| s.roll == roll)?;
        tracing::debug!(roll, index, "Record removed");
        Some(self.records.remove(index))
    }

    /// Records whose name, course or roll number contain `query`, ignoring case.
    ///
    /// An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Student> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&query)
                    || s.course.to_lowercase().contains(&query)
                    || s.roll.to_string().contains(&query)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
