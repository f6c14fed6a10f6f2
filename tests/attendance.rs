use attendance_dashboard::access::{Identity, Role};
use attendance_dashboard::analytics::{self, ClassTrend};
use attendance_dashboard::error::{AttendanceError, ValidationError};
use attendance_dashboard::manager::{AttendanceManager, AttendanceSubmission};
use attendance_dashboard::models::{AttendanceRecord, Class, Student};
use attendance_dashboard::sample::SampleOptions;
use attendance_dashboard::store::Upsert;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashMap};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Three students, two of them enrolled in the only class, and no history.
fn small_manager() -> AttendanceManager {
    let students = vec![
        Student {
            id: "s1".to_string(),
            name: "Ada".to_string(),
            roll_number: "R1".to_string(),
            email: "ada@example.com".to_string(),
        },
        Student {
            id: "s2".to_string(),
            name: "Grace".to_string(),
            roll_number: "R2".to_string(),
            email: "grace@example.com".to_string(),
        },
        Student {
            id: "s3".to_string(),
            name: "Linus".to_string(),
            roll_number: "R3".to_string(),
            email: "linus@example.com".to_string(),
        },
    ];
    let classes = vec![Class {
        id: "c1".to_string(),
        name: "Compilers".to_string(),
        code: "CS450".to_string(),
        faculty: "Faculty User".to_string(),
        subject: "Parsing".to_string(),
        schedule: "Tuesday - 9:00 AM".to_string(),
        total_students: 2,
    }];
    let enrollment = HashMap::from([(
        "c1".to_string(),
        BTreeSet::from(["s1".to_string(), "s2".to_string()]),
    )]);

    AttendanceManager::new(students, classes, enrollment, Vec::new())
}

#[test]
fn resubmitting_the_same_day_replaces_the_record() {
    let mut manager = small_manager();
    let day = date(2025, 3, 11);

    let first = AttendanceSubmission {
        class_id: "c1".to_string(),
        date: day,
        present: ids(&["s1", "s2"]),
        absent: vec![],
    };
    assert_eq!(manager.submit_attendance(first), Ok(Upsert::Inserted));

    let second = AttendanceSubmission {
        class_id: "c1".to_string(),
        date: day,
        present: ids(&["s2"]),
        absent: ids(&["s1"]),
    };
    assert_eq!(manager.submit_attendance(second), Ok(Upsert::Replaced));

    assert_eq!(manager.records().len(), 1);
    let record = manager.records().get("c1", day).unwrap();
    assert_eq!(record.id, "c1-2025-03-11");
    assert_eq!(record.present_students, BTreeSet::from(["s2".to_string()]));
    assert_eq!(record.absent_students, BTreeSet::from(["s1".to_string()]));
    assert_eq!(manager.class_rate("c1"), Ok(50.0));
}

#[test]
fn unenrolled_student_is_rejected_and_store_is_untouched() {
    let mut manager = small_manager();
    let day = date(2025, 3, 11);
    manager
        .submit_attendance(AttendanceSubmission {
            class_id: "c1".to_string(),
            date: day,
            present: ids(&["s1"]),
            absent: ids(&["s2"]),
        })
        .unwrap();
    let before = manager.records().get("c1", day).cloned();

    // s3 exists but is not enrolled in c1.
    let result = manager.submit_attendance(AttendanceSubmission {
        class_id: "c1".to_string(),
        date: day,
        present: ids(&["s1", "s3"]),
        absent: ids(&["s2"]),
    });

    assert_eq!(
        result,
        Err(AttendanceError::Validation(ValidationError::NotEnrolled {
            student: "s3".to_string(),
            class: "c1".to_string(),
        }))
    );
    assert_eq!(manager.records().len(), 1);
    assert_eq!(manager.records().get("c1", day).cloned(), before);
}

#[test]
fn class_without_records_reports_no_data() {
    let manager = small_manager();

    assert!(matches!(
        manager.class_rate("c1"),
        Err(AttendanceError::NoData(_))
    ));

    let stats = manager.stats(date(2025, 3, 11), 14);
    assert_eq!(stats.class_trends[0].avg_attendance, None);
    assert!(stats.daily_trends.is_empty());
    assert_eq!(stats.latest_rate(), None);
    assert!(matches!(
        stats.change(),
        Err(AttendanceError::InsufficientData { needed: 2, found: 0 })
    ));
}

#[test]
fn single_record_of_eight_out_of_ten_is_eighty_percent() {
    let present: BTreeSet<String> = (1..=8).map(|i| i.to_string()).collect();
    let absent: BTreeSet<String> = (9..=10).map(|i| i.to_string()).collect();
    let record = AttendanceRecord::new("c1", date(2025, 3, 11), present, absent);
    let manager = small_manager();

    let class = manager.get_class("c1").unwrap();
    assert_eq!(analytics::class_rate(class, [&record]), Ok(80.0));
}

#[test]
fn sample_data_daily_trend_skips_weekends() {
    // Sunday the 16th of March 2025.
    let today = date(2025, 3, 16);
    let manager = AttendanceManager::with_sample_data(&SampleOptions::default(), today).unwrap();

    let stats = manager.stats(today, 14);

    // 14 days ending on a Sunday hold exactly 10 weekdays.
    assert_eq!(stats.daily_trends.len(), 10);
    assert!(stats
        .daily_trends
        .iter()
        .all(|trend| !matches!(trend.date.weekday(), Weekday::Sat | Weekday::Sun)));
    assert!(stats
        .daily_trends
        .windows(2)
        .all(|pair| pair[0].date < pair[1].date));
    assert!(stats.change().is_ok());
}

#[test]
fn sample_records_keep_their_invariants() {
    let manager =
        AttendanceManager::with_sample_data(&SampleOptions::default(), date(2025, 3, 12)).unwrap();

    for record in manager.records().iter() {
        assert_eq!(
            record.present_count() + record.absent_count(),
            record.total_students
        );
        assert!(record.present_students.is_disjoint(&record.absent_students));
        assert!(record
            .present_students
            .iter()
            .chain(record.absent_students.iter())
            .all(|id| manager.is_enrolled(&record.class_id, id)));
    }
}

#[test]
fn leaderboard_breaks_ties_by_input_order() {
    let trend = |id: &str, rate: f64| ClassTrend {
        class_id: id.to_string(),
        name: id.to_string(),
        code: id.to_string(),
        subject: String::new(),
        avg_attendance: Some(rate),
    };
    let trends = vec![
        trend("first", 90.0),
        trend("second", 80.0),
        trend("third", 80.0),
        trend("fourth", 70.0),
    ];

    let top: Vec<(&str, Option<f64>)> = analytics::top_performers(&trends, 3)
        .into_iter()
        .map(|t| (t.class_id.as_str(), t.avg_attendance))
        .collect();

    assert_eq!(
        top,
        vec![
            ("first", Some(90.0)),
            ("second", Some(80.0)),
            ("third", Some(80.0)),
        ]
    );
}

#[test]
fn faculty_cannot_see_other_faculty_classes() {
    let manager =
        AttendanceManager::with_sample_data(&SampleOptions::default(), date(2025, 3, 12)).unwrap();
    let faculty = Identity::new("Faculty User", Role::Faculty);
    let stranger = Identity::new("Nobody", Role::Faculty);

    let codes: Vec<&str> = manager
        .visible_classes(&faculty)
        .into_iter()
        .map(|class| class.code.as_str())
        .collect();
    assert_eq!(codes, vec!["CS101", "CS201", "CS301"]);

    assert!(manager.visible_classes(&stranger).is_empty());
    assert!(manager.visible_history(&stranger, None).is_empty());
}
