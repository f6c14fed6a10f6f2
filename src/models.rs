use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ValidationError;

pub type StudentId = String;
pub type ClassId = String;

/// The date format used everywhere a date is read from or written to text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_number: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub code: String,
    /// Name of the faculty member who owns this class.
    pub faculty: String,
    pub subject: String,
    pub schedule: String,
    pub total_students: usize,
}

/// The attendance taken for one class on one day.
///
/// Students are either present or absent, never both, so `total_students` is always the size of
/// the two sets combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub present_students: BTreeSet<StudentId>,
    pub absent_students: BTreeSet<StudentId>,
    pub total_students: usize,
}

impl AttendanceRecord {
    /// Builds a record, deriving its ID and total from the class, date and the two sets.
    pub fn new(
        class_id: &str,
        date: NaiveDate,
        present_students: BTreeSet<StudentId>,
        absent_students: BTreeSet<StudentId>,
    ) -> Self {
        Self {
            id: record_id(class_id, date),
            class_id: class_id.to_string(),
            date,
            total_students: present_students.len() + absent_students.len(),
            present_students,
            absent_students,
        }
    }

    pub fn present_count(&self) -> usize {
        self.present_students.len()
    }

    pub fn absent_count(&self) -> usize {
        self.absent_students.len()
    }

    /// Percentage of students present, or `None` for a record with nobody in it.
    pub fn attendance_rate(&self) -> Option<f64> {
        if self.total_students == 0 {
            return None;
        }

        Some(self.present_count() as f64 / self.total_students as f64 * 100.0)
    }

    /// Returns true if this record is for the given class and day.
    pub fn is_for(&self, class_id: &str, date: NaiveDate) -> bool {
        self.class_id == class_id && self.date == date
    }
}

/// The ID of the record for a class on a given day.
pub fn record_id(class_id: &str, date: NaiveDate) -> String {
    format!("{}-{}", class_id, date.format(DATE_FORMAT))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}
