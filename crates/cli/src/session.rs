//! The interactive menu loop.
//!
//! One state only: waiting for a menu choice. Each operation runs to
//! completion and control comes back here. The loop ends through "Save & Exit"
//! or when input runs out, and both paths save first.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use roster_core::Student;
use roster_store::{LoadSource, Roster};

use crate::prompt::{MenuChoice, PromptError, Prompter, Result};
use crate::table;

pub const MENU: &str = "\n===== STUDENT RESULT MANAGEMENT SYSTEM =====\n\
1. Display All Students\n\
2. Add Student\n\
3. Search Student\n\
4. Delete Student\n\
5. Save & Exit\n\
Choose an option: ";

const ROLL_RETRY: &str = "Invalid input. Enter Roll Number: ";

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// "Save & Exit" chosen and the save succeeded
    Saved,
    /// Input closed; `saved` tells whether the final save succeeded
    EndOfInput { saved: bool },
}

impl Exit {
    pub fn code(self) -> i32 {
        match self {
            Exit::Saved | Exit::EndOfInput { saved: true } => 0,
            Exit::EndOfInput { saved: false } => 1,
        }
    }
}

pub struct Session<R, W> {
    roster: Roster,
    data_file: PathBuf,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(roster: Roster, data_file: impl Into<PathBuf>, prompter: Prompter<R, W>) -> Self {
        Self { roster, data_file: data_file.into(), prompter }
    }

    /// Load `data_file` and report the result to the user.
    ///
    /// A file that exists but cannot be read is reported and the session
    /// starts empty.
    pub fn open(data_file: &Path, capacity: usize, mut prompter: Prompter<R, W>) -> Result<Self> {
        let out = prompter.output();
        let roster = match roster_store::load(data_file, capacity) {
            Ok(report) => {
                match report.source {
                    LoadSource::File => {
                        writeln!(out, "{} record(s) loaded from {}", report.loaded, data_file.display())?
                    }
                    LoadSource::Missing => writeln!(out, "No existing records found. Starting fresh.")?,
                }
                report.roster
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load records");
                writeln!(out, "Could not read {}: {}. Starting fresh.", data_file.display(), e)?;
                Roster::with_capacity(capacity)
            }
        };

        Ok(Self::new(roster, data_file, prompter))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn into_parts(self) -> (Roster, Prompter<R, W>) {
        (self.roster, self.prompter)
    }

    /// Run the menu until the user saves and exits or input ends.
    pub fn run(&mut self) -> Result<Exit> {
        loop {
            self.prompter.show(MENU)?;

            let step = match self.prompter.read_choice() {
                Ok(choice) => self.dispatch(choice),
                Err(e) => Err(e),
            };

            match step {
                Ok(Some(exit)) => return Ok(exit),
                Ok(None) => {}
                Err(PromptError::Eof) => {
                    tracing::info!("Input closed, saving before exit");
                    let saved = self.save()?;
                    return Ok(Exit::EndOfInput { saved });
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Option<Exit>> {
        tracing::debug!(?choice, "Menu choice");
        match choice {
            MenuChoice::DisplayAll => self.display_all()?,
            MenuChoice::Add => self.add()?,
            MenuChoice::Search => self.search()?,
            MenuChoice::Delete => self.delete()?,
            MenuChoice::SaveAndExit => {
                if self.save()? {
                    return Ok(Some(Exit::Saved));
                }
            }
            MenuChoice::Unknown(_) => writeln!(self.prompter.output(), "Invalid choice. Try again.")?,
            MenuChoice::Invalid => writeln!(self.prompter.output(), "Invalid choice. Please enter a number.")?,
        }
        Ok(None)
    }

    fn display_all(&mut self) -> Result<()> {
        let out = self.prompter.output();
        if self.roster.is_empty() {
            writeln!(out, "No records available.")?;
            return Ok(());
        }
        table::write_table(out, &self.roster)?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        if self.roster.is_full() {
            writeln!(self.prompter.output(), "Maximum limit reached!")?;
            return Ok(());
        }

        let p = &mut self.prompter;
        let name = p.read_text(
            "\nEnter Student Name  : ",
            "name",
            "Invalid input. Name must be 1-49 characters: ",
        )?;
        let roll = p.read_int("Enter Roll Number   : ", ROLL_RETRY)?;
        let course = p.read_text(
            "Enter Course        : ",
            "course",
            "Invalid input. Course must be 1-49 characters: ",
        )?;
        let year = p.read_int("Enter Year          : ", "Invalid input. Enter Year: ")?;
        let cgpa = p.read_float("Enter CGPA          : ", "Invalid input. Enter CGPA: ")?;

        match self.roster.push(Student::new(name, roll, course, year, cgpa)) {
            Ok(()) => writeln!(self.prompter.output(), "Student added successfully.")?,
            Err(e) => writeln!(self.prompter.output(), "{e}")?,
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let roll = self.prompter.read_int("\nEnter Roll Number to search: ", ROLL_RETRY)?;
        let out = self.prompter.output();
        match self.roster.find(roll) {
            Some(student) => {
                writeln!(out)?;
                writeln!(out, "Record Found:")?;
                table::write_header(out)?;
                table::write_row(out, student)?;
            }
            None => writeln!(out, "No student found with Roll Number {roll}")?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let roll = self.prompter.read_int("\nEnter Roll Number to delete: ", ROLL_RETRY)?;
        let message = match self.roster.remove(roll) {
            Some(_) => "Record deleted successfully.".to_string(),
            None => format!("No record found with Roll Number {roll}"),
        };
        writeln!(self.prompter.output(), "{message}")?;
        Ok(())
    }

    /// Persist the roster. A failed save is reported and returns `false`.
    fn save(&mut self) -> Result<bool> {
        match roster_store::save(&self.data_file, &self.roster) {
            Ok(_) => {
                writeln!(self.prompter.output(), "Data saved successfully.")?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, "Save failed");
                writeln!(self.prompter.output(), "Error opening file for saving! ({e})")?;
                Ok(false)
            }
        }
    }
}
