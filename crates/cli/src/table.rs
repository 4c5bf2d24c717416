//! Fixed-width table rendering shared by the menu and `roster list`.

use roster_core::Student;
use std::io::{self, Write};

pub const RULE: &str = "---------------------------------------------------------------------";

pub fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{:<20} {:<10} {:<20} {:<6} {:<6}", "Name", "RollNo", "Course", "Year", "CGPA")?;
    writeln!(out, "{RULE}")
}

pub fn write_row<W: Write>(out: &mut W, s: &Student) -> io::Result<()> {
    writeln!(out, "{:<20} {:<10} {:<20} {:<6} {:.2}", s.name, s.roll, s.course, s.year, s.cgpa)
}

/// Header, one row per record, closing rule.
pub fn write_table<'a, W, I>(out: &mut W, students: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Student>,
{
    write_header(out)?;
    for s in students {
        write_row(out, s)?;
    }
    writeln!(out, "{RULE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(students: &[Student]) -> String {
        let mut out = Vec::new();
        write_table(&mut out, students).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rule_width() {
        assert_eq!(RULE.len(), 69);
    }

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        write_header(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Name                 RollNo     Course               Year   CGPA  ");
        assert_eq!(lines[2], RULE);
    }

    #[test]
    fn test_row_layout() {
        let mut out = Vec::new();
        write_row(&mut out, &Student::new("Ada", 101, "CS", 2, 3.9)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Ada                  101        CS                   2      3.90\n"
        );
    }

    #[test]
    fn test_table_rows_in_order() {
        let text = render(&[Student::new("B", 2, "X", 1, 1.0), Student::new("A", 1, "Y", 1, 2.0)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[3].starts_with("B "));
        assert!(lines[4].starts_with("A "));
        assert_eq!(lines[5], RULE);
    }
}
