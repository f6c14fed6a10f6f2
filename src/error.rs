//! Errors returned by the attendance store, the submission path and the analytics.

use thiserror::Error;

use crate::models::{ClassId, StudentId};

/// Reasons an attendance submission or an input value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("class '{0}' does not exist")]
    UnknownClass(ClassId),

    #[error("student '{student}' is not enrolled in class '{class}'")]
    NotEnrolled { student: StudentId, class: ClassId },

    #[error("student '{0}' is marked both present and absent")]
    ConflictingStatus(StudentId),

    #[error("student '{0}' is listed more than once")]
    DuplicateStudent(StudentId),

    #[error("attendance for class '{0}' lists no students")]
    EmptySubmission(ClassId),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// An aggregation was asked for over an empty set of records.
    #[error("no attendance data for {0}")]
    NoData(String),

    /// A trend needs more daily entries than are available.
    #[error("not enough attendance data: need {needed} days, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AttendanceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AttendanceError::Validation(_))
    }
}

pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;
