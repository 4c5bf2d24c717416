//! In-memory student roster with flat-file persistence
//!
//! # Example
//!
//! ```no_run
//! use roster_core::Student;
//! use roster_store::{Roster, load, save};
//! use std::path::Path;
//!
//! let path = Path::new("students.csv");
//! let mut roster = load(path, 100)?.roster;
//! roster.push(Student::new("Ada", 101, "CS", 2, 3.9))?;
//! save(path, &roster)?;
//! # Ok::<(), roster_store::Error>(())
//! ```

pub mod codec;
mod error;
mod interchange;
mod persist;
mod roster;

pub use codec::DecodeError;
pub use error::{Error, Result};
pub use interchange::{CSV_HEADER, ImportReport, export_csv, export_json, import_csv};
pub use persist::{LoadReport, LoadSource, load, save};
pub use roster::{DEFAULT_CAPACITY, Roster};
