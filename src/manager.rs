use chrono::NaiveDate;
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};

use crate::access::Identity;
use crate::analytics::{self, AttendanceStats};
use crate::error::{AttendanceError, Result, ValidationError};
use crate::models::{AttendanceRecord, Class, ClassId, Student, StudentId};
use crate::sample::{self, SampleOptions};
use crate::store::{RecordStore, Upsert};

/// Attendance for one class on one day, as submitted by a faculty member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSubmission {
    pub class_id: ClassId,
    pub date: NaiveDate,
    pub present: Vec<StudentId>,
    pub absent: Vec<StudentId>,
}

/// An attendance sheet for a class, with every enrolled student initially marked present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    class_id: ClassId,
    date: NaiveDate,
    /// Every enrolled student and whether they are present, in roster order.
    entries: Vec<(StudentId, bool)>,
}

impl AttendanceSheet {
    fn mark(&mut self, student_id: &str, is_present: bool) -> Result<(), ValidationError> {
        match self.entries.iter_mut().find(|(id, _)| id == student_id) {
            Some((_, present)) => {
                *present = is_present;
                Ok(())
            }
            None => Err(ValidationError::NotEnrolled {
                student: student_id.to_string(),
                class: self.class_id.clone(),
            }),
        }
    }

    pub fn mark_present(&mut self, student_id: &str) -> Result<(), ValidationError> {
        self.mark(student_id, true)
    }

    pub fn mark_absent(&mut self, student_id: &str) -> Result<(), ValidationError> {
        self.mark(student_id, false)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|(_, present)| *present).count()
    }

    pub fn absent_count(&self) -> usize {
        self.entries.len() - self.present_count()
    }

    pub fn into_submission(self) -> AttendanceSubmission {
        let (present, absent): (Vec<_>, Vec<_>) =
            self.entries.into_iter().partition(|(_, present)| *present);

        AttendanceSubmission {
            class_id: self.class_id,
            date: self.date,
            present: present.into_iter().map(|(id, _)| id).collect(),
            absent: absent.into_iter().map(|(id, _)| id).collect(),
        }
    }
}

/// The manager for recording and retrieving attendance data.
///
/// It owns the students, the classes, which students are enrolled in which class, and every
/// attendance record. Nothing is persisted: all of it lives for as long as the manager does.
pub struct AttendanceManager {
    students: Vec<Student>,
    classes: Vec<Class>,
    enrollment: HashMap<ClassId, BTreeSet<StudentId>>,
    records: RecordStore,
}

impl AttendanceManager {
    pub fn new(
        students: Vec<Student>,
        classes: Vec<Class>,
        enrollment: HashMap<ClassId, BTreeSet<StudentId>>,
        records: impl IntoIterator<Item = AttendanceRecord>,
    ) -> Self {
        Self {
            students,
            classes,
            enrollment,
            records: RecordStore::from_records(records),
        }
    }

    /// Creates a manager filled with the demo data set, with history ending on `today`.
    pub fn with_sample_data(options: &SampleOptions, today: NaiveDate) -> Result<Self> {
        let data = sample::generate(options, today)?;

        Ok(Self::new(
            data.students,
            data.classes,
            data.enrollment,
            data.records,
        ))
    }

    /// Returns the total number of students.
    pub fn num_students(&self) -> usize {
        self.students.len()
    }

    /// Retrieves every student.
    pub fn get_roster(&self) -> &[Student] {
        &self.students
    }

    /// Retrieves a specific student based on their ID.
    pub fn get_student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    /// Students whose name, roll number or email contains `term`, ignoring case.
    pub fn search_students(&self, term: &str) -> Vec<&Student> {
        let term = term.trim().to_lowercase();

        self.students
            .iter()
            .filter(|student| {
                term.is_empty()
                    || student.name.to_lowercase().contains(&term)
                    || student.roll_number.to_lowercase().contains(&term)
                    || student.email.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn get_class(&self, class_id: &str) -> Result<&Class, ValidationError> {
        self.classes
            .iter()
            .find(|class| class.id == class_id)
            .ok_or_else(|| ValidationError::UnknownClass(class_id.to_string()))
    }

    /// The classes `identity` is allowed to see.
    pub fn visible_classes(&self, identity: &Identity) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|class| identity.can_view(class))
            .collect()
    }

    /// Visible classes whose name, code or subject contains `term`, ignoring case.
    pub fn search_classes(&self, identity: &Identity, term: &str) -> Vec<&Class> {
        let term = term.trim().to_lowercase();

        self.visible_classes(identity)
            .into_iter()
            .filter(|class| {
                term.is_empty()
                    || class.name.to_lowercase().contains(&term)
                    || class.code.to_lowercase().contains(&term)
                    || class.subject.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Returns true if the student is enrolled in the class.
    pub fn is_enrolled(&self, class_id: &str, student_id: &str) -> bool {
        self.enrollment
            .get(class_id)
            .is_some_and(|members| members.contains(student_id))
    }

    /// Retrieves the students enrolled in a class, in roster order.
    pub fn get_class_roster(&self, class_id: &str) -> Result<Vec<&Student>, ValidationError> {
        self.get_class(class_id)?;

        Ok(self
            .students
            .iter()
            .filter(|student| self.is_enrolled(class_id, &student.id))
            .collect())
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Attendance records, most recent first, optionally only those of one class.
    pub fn history(&self, class_id: Option<&str>) -> Vec<&AttendanceRecord> {
        let mut records = self
            .records
            .query(|record| class_id.is_none_or(|id| record.class_id == id));

        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    /// Like [`AttendanceManager::history`], but leaving out classes `identity` cannot see.
    pub fn visible_history(
        &self,
        identity: &Identity,
        class_id: Option<&str>,
    ) -> Vec<&AttendanceRecord> {
        let visible: BTreeSet<&str> = self
            .visible_classes(identity)
            .into_iter()
            .map(|class| class.id.as_str())
            .collect();

        self.history(class_id)
            .into_iter()
            .filter(|record| visible.contains(record.class_id.as_str()))
            .collect()
    }

    /// The average attendance rate of a class over all of its records.
    pub fn class_rate(&self, class_id: &str) -> Result<f64> {
        let class = self.get_class(class_id)?;
        analytics::class_rate(class, self.records.iter())
    }

    /// Class and daily trends for the `window_days` days ending on `end`.
    pub fn stats(&self, end: NaiveDate, window_days: u32) -> AttendanceStats {
        AttendanceStats::compute(&self.classes, self.records.iter(), end, window_days)
    }

    /// Percentage of absences over the `days` days ending on `end`.
    pub fn absentee_rate(&self, end: NaiveDate, days: u32) -> Result<f64> {
        analytics::absentee_rate(self.records.iter(), end, days)
    }

    /// A blank attendance sheet for a class, with every enrolled student marked present.
    pub fn attendance_sheet(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<AttendanceSheet, ValidationError> {
        let entries = self
            .get_class_roster(class_id)?
            .into_iter()
            .map(|student| (student.id.clone(), true))
            .collect();

        Ok(AttendanceSheet {
            class_id: class_id.to_string(),
            date,
            entries,
        })
    }

    fn validate(&self, submission: &AttendanceSubmission) -> Result<(), ValidationError> {
        let class_id = &submission.class_id;
        self.get_class(class_id)?;

        if submission.present.is_empty() && submission.absent.is_empty() {
            return Err(ValidationError::EmptySubmission(class_id.clone()));
        }

        let mut present = BTreeSet::new();
        for id in &submission.present {
            if !present.insert(id.as_str()) {
                return Err(ValidationError::DuplicateStudent(id.clone()));
            }
        }

        let mut absent = BTreeSet::new();
        for id in &submission.absent {
            if present.contains(id.as_str()) {
                return Err(ValidationError::ConflictingStatus(id.clone()));
            }
            if !absent.insert(id.as_str()) {
                return Err(ValidationError::DuplicateStudent(id.clone()));
            }
        }

        if let Some(id) = present
            .iter()
            .chain(absent.iter())
            .find(|id| !self.is_enrolled(class_id, id))
        {
            return Err(ValidationError::NotEnrolled {
                student: id.to_string(),
                class: class_id.clone(),
            });
        }

        Ok(())
    }

    /// Records attendance for a class on a day. If attendance was already taken for that class and
    /// day, it is overwritten.
    ///
    /// Every listed student must be enrolled in the class and listed exactly once. If the
    /// submission is rejected, no records are changed.
    pub fn submit_attendance(&mut self, submission: AttendanceSubmission) -> Result<Upsert> {
        if let Err(e) = self.validate(&submission) {
            warn!(
                "Rejected attendance for class {} on {}: {}",
                submission.class_id, submission.date, e
            );
            return Err(AttendanceError::Validation(e));
        }

        let record = AttendanceRecord::new(
            &submission.class_id,
            submission.date,
            submission.present.into_iter().collect(),
            submission.absent.into_iter().collect(),
        );

        info!(
            "Recording attendance {}: {} present, {} absent",
            record.id,
            record.present_count(),
            record.absent_count()
        );

        Ok(self.records.upsert(record))
    }
}
