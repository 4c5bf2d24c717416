use std::io::Cursor;
use std::path::Path;

use roster_cli::{Exit, Prompter, Session};
use roster_core::Student;
use tempfile::TempDir;

/// Open a session on `data_file`, feed it `input` and return the exit and transcript.
fn run_session(data_file: &Path, capacity: usize, input: &str) -> (Exit, Vec<Student>, String) {
    let prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let mut session = Session::open(data_file, capacity, prompter).unwrap();
    let exit = session.run().unwrap();
    let (roster, prompter) = session.into_parts();
    let transcript = String::from_utf8(prompter.into_output()).unwrap();
    (exit, roster.records().to_vec(), transcript)
}

fn add_input(name: &str, roll: i32, course: &str, year: i32, cgpa: &str) -> String {
    format!("2\n{name}\n{roll}\n{course}\n{year}\n{cgpa}\n")
}

#[test]
fn test_add_save_and_restart() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");

    let mut input = String::new();
    input.push_str(&add_input("Ada Lovelace", 101, "Mathematics", 2, "3.9"));
    input.push_str(&add_input("Alan Turing", 102, "Computer Science", 3, "3.456"));
    input.push_str(&add_input("Grace Hopper", 103, "Computer Science", 4, "3.7"));
    input.push_str("1\n5\n");

    let (exit, records, transcript) = run_session(&data_file, 100, &input);
    assert_eq!(exit, Exit::Saved);
    assert_eq!(exit.code(), 0);
    assert!(transcript.starts_with("No existing records found. Starting fresh.\n"));
    assert_eq!(transcript.matches("Student added successfully.").count(), 3);

    let ada = transcript.find("Ada Lovelace").unwrap();
    let alan = transcript.find("Alan Turing").unwrap();
    let grace = transcript.find("Grace Hopper").unwrap();
    assert!(ada < alan && alan < grace);
    assert!(transcript.contains("3.46"));

    let (_, restored, transcript) = run_session(&data_file, 100, "5\n");
    assert!(transcript.starts_with(&format!("3 record(s) loaded from {}", data_file.display())));
    assert_eq!(restored.len(), records.len());
    for (before, after) in records.iter().zip(&restored) {
        assert_eq!(after.name, before.name);
        assert_eq!(after.roll, before.roll);
        assert_eq!(after.course, before.course);
        assert_eq!(after.year, before.year);
        assert_eq!(after.cgpa, before.cgpa_rounded());
    }
}

#[test]
fn test_malformed_line_is_skipped_on_startup() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::write(&data_file, "Ada,101,CS,2,3.90\nBadRow,oops\n").unwrap();

    let (_, records, transcript) = run_session(&data_file, 100, "5\n");
    assert!(transcript.starts_with("1 record(s) loaded from"));
    assert_eq!(records, vec![Student::new("Ada", 101, "CS", 2, 3.9)]);
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "Ada,101,CS,2,3.90\n");
}

#[test]
fn test_delete_then_restart_keeps_order() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::write(
        &data_file,
        "A,1,CS,1,1.00\nB,2,CS,1,2.00\nC,3,CS,1,3.00\nD,4,CS,1,4.00\n",
    )
    .unwrap();

    let (_, records, _) = run_session(&data_file, 100, "4\n2\n4\n42\n5\n");
    let rolls: Vec<i32> = records.iter().map(|s| s.roll).collect();
    assert_eq!(rolls, vec![1, 3, 4]);

    assert_eq!(
        std::fs::read_to_string(&data_file).unwrap(),
        "A,1,CS,1,1.00\nC,3,CS,1,3.00\nD,4,CS,1,4.00\n"
    );
}

#[test]
fn test_capacity_limit_from_session() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::write(&data_file, "A,1,CS,1,1.00\nB,2,CS,1,2.00\n").unwrap();

    let (_, records, transcript) = run_session(&data_file, 2, "2\n5\n");
    assert_eq!(records.len(), 2);
    assert!(transcript.contains("Maximum limit reached!"));
}

#[test]
fn test_garbage_at_menu_does_not_advance() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");

    let (exit, records, transcript) = run_session(&data_file, 100, "x y z\n\n???\n5\n");
    assert_eq!(exit, Exit::Saved);
    assert!(records.is_empty());
    assert_eq!(transcript.matches("Invalid choice. Please enter a number.").count(), 2);
    assert_eq!(transcript.matches("1. Display All Students").count(), 3);
}

#[test]
fn test_duplicate_rolls_address_first_match() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::write(&data_file, "First,7,CS,1,1.00\nSecond,7,CS,1,2.00\n").unwrap();

    let (_, records, transcript) = run_session(&data_file, 100, "3\n7\n4\n7\n5\n");
    assert!(transcript.contains("First"));
    assert_eq!(records, vec![Student::new("Second", 7, "CS", 1, 2.0)]);
}

#[test]
fn test_invalid_utf8_line_does_not_lose_records() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::write(&data_file, b"Ada,101,CS,2,3.90\nAlan,102,CS,3,3.10\nJos\xe9,103,CS,1,3.00\n").unwrap();

    let (exit, records, transcript) = run_session(&data_file, 100, "5\n");
    assert_eq!(exit, Exit::Saved);
    assert!(transcript.starts_with("2 record(s) loaded from"));
    assert_eq!(records.len(), 2);
    assert_eq!(
        std::fs::read_to_string(&data_file).unwrap(),
        "Ada,101,CS,2,3.90\nAlan,102,CS,3,3.10\n"
    );
}

#[test]
fn test_unreadable_record_path_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let data_file = temp.path().join("students.csv");
    std::fs::create_dir(&data_file).unwrap();

    let (exit, records, transcript) = run_session(&data_file, 100, "5\n");
    assert!(transcript.contains("Could not read"));
    assert!(transcript.contains("Starting fresh."));
    assert!(records.is_empty());

    assert!(transcript.contains("Error opening file for saving!"));
    assert_eq!(transcript.matches("Choose an option: ").count(), 2);
    assert_eq!(exit, Exit::EndOfInput { saved: false });
    assert!(data_file.is_dir());
}
