//! The demo data set: a fixed list of students and classes, plus randomly generated attendance
//! history for every weekday in a recent window.
//!
//! Generation is driven by a seeded [`StdRng`], so the same seed and end date always produce the
//! same records.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::error::ValidationError;
use crate::models::{AttendanceRecord, Class, ClassId, Student, StudentId};

/// The longest history [`generate`] accepts, one year including a leap day.
pub const MAX_HISTORY_DAYS: u32 = 366;

/// Knobs for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOptions {
    pub seed: u64,
    /// Chance that any one student is present at any one class meeting.
    pub presence_probability: f64,
    /// How many days before `today` to generate history for. `today` itself is always included.
    pub history_days: u32,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            presence_probability: 0.85,
            history_days: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleData {
    pub students: Vec<Student>,
    pub classes: Vec<Class>,
    pub enrollment: HashMap<ClassId, BTreeSet<StudentId>>,
    pub records: Vec<AttendanceRecord>,
}

pub fn students() -> Vec<Student> {
    const STUDENTS: [(&str, &str, &str); 12] = [
        ("John Smith", "CS001", "john@example.com"),
        ("Emma Johnson", "CS002", "emma@example.com"),
        ("Michael Brown", "CS003", "michael@example.com"),
        ("Sophia Martinez", "CS004", "sophia@example.com"),
        ("William Davis", "CS005", "william@example.com"),
        ("Olivia Wilson", "CS006", "olivia@example.com"),
        ("James Anderson", "CS007", "james@example.com"),
        ("Charlotte Thomas", "CS008", "charlotte@example.com"),
        ("Benjamin Taylor", "CS009", "benjamin@example.com"),
        ("Amelia Moore", "CS010", "amelia@example.com"),
        ("Ethan Jackson", "CS011", "ethan@example.com"),
        ("Mia White", "CS012", "mia@example.com"),
    ];

    STUDENTS
        .iter()
        .enumerate()
        .map(|(i, (name, roll_number, email))| Student {
            id: (i + 1).to_string(),
            name: name.to_string(),
            roll_number: roll_number.to_string(),
            email: email.to_string(),
        })
        .collect()
}

pub fn classes() -> Vec<Class> {
    let class = |id: &str,
                 name: &str,
                 code: &str,
                 faculty: &str,
                 subject: &str,
                 schedule: &str,
                 total| Class {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        faculty: faculty.to_string(),
        subject: subject.to_string(),
        schedule: schedule.to_string(),
        total_students: total,
    };

    vec![
        class(
            "1",
            "Computer Science 101",
            "CS101",
            "Faculty User",
            "Introduction to Programming",
            "Monday, Wednesday, Friday - 10:00 AM",
            12,
        ),
        class(
            "2",
            "Data Structures",
            "CS201",
            "Faculty User",
            "Algorithms & Data Structures",
            "Tuesday, Thursday - 1:00 PM",
            10,
        ),
        class(
            "3",
            "Web Development",
            "CS301",
            "Faculty User",
            "Full Stack Development",
            "Monday, Friday - 2:00 PM",
            8,
        ),
        class(
            "4",
            "Database Systems",
            "CS401",
            "Admin User",
            "SQL & Database Design",
            "Wednesday, Friday - 9:00 AM",
            9,
        ),
    ]
}

/// Enrolls the first `total_students` students of `students` in each class.
pub fn enrollment(
    students: &[Student],
    classes: &[Class],
) -> HashMap<ClassId, BTreeSet<StudentId>> {
    classes
        .iter()
        .map(|class| {
            let members = students
                .iter()
                .take(class.total_students)
                .map(|student| student.id.clone())
                .collect();
            (class.id.clone(), members)
        })
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Generates the full demo data set with attendance history ending on `today`.
pub fn generate(options: &SampleOptions, today: NaiveDate) -> Result<SampleData, ValidationError> {
    if !(0.0..=1.0).contains(&options.presence_probability) {
        return Err(ValidationError::InvalidSetting(format!(
            "presence probability {} is not between 0 and 1",
            options.presence_probability
        )));
    }
    if options.history_days > MAX_HISTORY_DAYS {
        return Err(ValidationError::InvalidSetting(format!(
            "history of {} days is longer than {MAX_HISTORY_DAYS}",
            options.history_days
        )));
    }

    let students = students();
    let classes = classes();
    let enrollment = enrollment(&students, &classes);

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut records = Vec::new();

    for class in &classes {
        let Some(members) = enrollment.get(&class.id).filter(|members| !members.is_empty()) else {
            continue;
        };

        for days_ago in (0..=options.history_days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(days_ago))) else {
                continue;
            };
            if is_weekend(date) {
                continue;
            }

            let (present, absent): (BTreeSet<StudentId>, BTreeSet<StudentId>) = members
                .iter()
                .cloned()
                .partition(|_| rng.gen_bool(options.presence_probability));

            records.push(AttendanceRecord::new(&class.id, date, present, absent));
        }
    }

    debug!(
        "Generated {} sample attendance records (seed {}) ending {}",
        records.len(),
        options.seed,
        today
    );

    Ok(SampleData {
        students,
        classes,
        enrollment,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    #[test]
    fn records_partition_each_roster() {
        let data = generate(&SampleOptions::default(), today()).unwrap();

        assert!(!data.records.is_empty());
        for record in &data.records {
            assert_eq!(
                record.present_students.len() + record.absent_students.len(),
                record.total_students
            );
            assert!(record.present_students.is_disjoint(&record.absent_students));

            let members = &data.enrollment[&record.class_id];
            assert!(record.present_students.is_subset(members));
            assert!(record.absent_students.is_subset(members));
            assert_eq!(record.total_students, members.len());
        }
    }

    #[test]
    fn weekends_are_skipped() {
        let data = generate(&SampleOptions::default(), today()).unwrap();

        assert!(data.records.iter().all(|record| !is_weekend(record.date)));
        // The 15 days from Wed 26 Feb to Wed 12 Mar hold 11 weekdays, for each of 4 classes.
        assert_eq!(data.records.len(), 44);
    }

    #[test]
    fn same_seed_same_data() {
        let options = SampleOptions {
            seed: 7,
            ..SampleOptions::default()
        };

        let first = generate(&options, today()).unwrap();
        let second = generate(&options, today()).unwrap();

        assert_eq!(first.records, second.records);
    }

    #[test]
    fn enrollment_follows_class_sizes() {
        let students = students();
        let classes = classes();
        let enrollment = enrollment(&students, &classes);

        for class in &classes {
            assert_eq!(enrollment[&class.id].len(), class.total_students);
        }
        assert!(!enrollment["3"].contains("9"));
    }

    #[test]
    fn extreme_probabilities() {
        let everyone = SampleOptions {
            presence_probability: 1.0,
            ..SampleOptions::default()
        };
        let data = generate(&everyone, today()).unwrap();
        assert!(data.records.iter().all(|r| r.absent_students.is_empty()));

        let invalid = SampleOptions {
            presence_probability: 1.5,
            ..SampleOptions::default()
        };
        assert!(matches!(
            generate(&invalid, today()),
            Err(ValidationError::InvalidSetting(_))
        ));
    }

    #[test]
    fn history_is_capped_at_a_year() {
        let year = SampleOptions {
            history_days: MAX_HISTORY_DAYS,
            ..SampleOptions::default()
        };
        let data = generate(&year, today()).unwrap();
        let earliest = data.records.iter().map(|r| r.date).min().unwrap();
        assert!(earliest >= NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());

        let unbounded = SampleOptions {
            history_days: u32::MAX,
            ..SampleOptions::default()
        };
        assert!(matches!(
            generate(&unbounded, today()),
            Err(ValidationError::InvalidSetting(_))
        ));
    }
}
