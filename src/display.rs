use chrono::NaiveDate;
use tabled::{Table, Tabled, settings::Style};

use crate::access::Identity;
use crate::analytics::{Change, DailyTrend};
use crate::error::{Result, ValidationError};
use crate::manager::AttendanceManager;
use crate::models::{AttendanceRecord, Class, DATE_FORMAT, Student};
use crate::settings::AnalyticsSettings;

/// How many classes the dashboard lists.
const DASHBOARD_CLASSES: usize = 5;

fn rate(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_string(),
    }
}

fn change(value: Result<Change>) -> String {
    match value {
        Ok(change) if change.is_positive => format!("+{:.1} ▲", change.value),
        Ok(change) => format!("{:.1} ▼", change.value),
        Err(_) => "n/a".to_string(),
    }
}

fn modern(mut table: Table) -> Table {
    table.with(Style::modern());
    table
}

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Class")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Students")]
    total_students: usize,
}

impl From<&Class> for ClassRow {
    fn from(class: &Class) -> Self {
        Self {
            id: class.id.clone(),
            name: class.name.clone(),
            code: class.code.clone(),
            subject: class.subject.clone(),
            schedule: class.schedule.clone(),
            total_students: class.total_students,
        }
    }
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Roll No")]
    roll_number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            roll_number: student.roll_number.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Present")]
    present: usize,
    #[tabled(rename = "Absent")]
    absent: usize,
    #[tabled(rename = "Attendance Rate")]
    rate: String,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Attendance")]
    rate: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Class")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Attendance")]
    rate: String,
}

fn history_table(manager: &AttendanceManager, records: &[&AttendanceRecord]) -> Table {
    let rows = records.iter().map(|record| HistoryRow {
        date: record.date.format("%b %d, %Y").to_string(),
        class: manager
            .get_class(&record.class_id)
            .map(|class| class.name.clone())
            .unwrap_or_else(|_| "Unknown Class".to_string()),
        present: record.present_count(),
        absent: record.absent_count(),
        rate: rate(record.attendance_rate()),
    });

    modern(Table::new(rows))
}

fn daily_table(trends: &[DailyTrend]) -> Table {
    let rows = trends.iter().map(|trend| TrendRow {
        date: trend.date.format(DATE_FORMAT).to_string(),
        rate: rate(Some(trend.attendance_rate)),
    });

    modern(Table::new(rows))
}

/// Pretty prints the headline numbers, the daily trend and the first few visible classes.
pub fn show_dashboard(
    manager: &AttendanceManager,
    identity: &Identity,
    today: NaiveDate,
    analytics: &AnalyticsSettings,
) {
    let stats = manager.stats(today, analytics.window_days);
    let classes = manager.visible_classes(identity);

    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "Stat")]
        title: &'static str,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Change")]
        change: String,
    }

    let stat_rows = vec![
        StatRow {
            title: "Total Classes",
            value: classes.len().to_string(),
            change: String::new(),
        },
        StatRow {
            title: "Total Students",
            value: manager.num_students().to_string(),
            change: String::new(),
        },
        StatRow {
            title: "Attendance Rate",
            value: rate(stats.latest_rate()),
            change: change(stats.change()),
        },
        StatRow {
            title: "Absentee Rate",
            value: rate(manager.absentee_rate(today, analytics.recent_days).ok()),
            change: format!("last {} days", analytics.recent_days),
        },
    ];

    println!("Signed in as {} ({})", identity.name, identity.role);
    println!("{}", modern(Table::new(stat_rows)));
    println!("Daily attendance trends:\n{}", daily_table(&stats.daily_trends));

    let recent = classes
        .into_iter()
        .take(DASHBOARD_CLASSES)
        .map(ClassRow::from);
    println!("Recent classes:\n{}", modern(Table::new(recent)));
}

/// Pretty prints the daily trend, every class's average and the best attended classes.
pub fn show_analytics(
    manager: &AttendanceManager,
    today: NaiveDate,
    analytics: &AnalyticsSettings,
) {
    let stats = manager.stats(today, analytics.window_days);

    println!("Daily attendance trends:\n{}", daily_table(&stats.daily_trends));

    #[derive(Tabled)]
    struct ComparisonRow {
        #[tabled(rename = "Code")]
        code: String,
        #[tabled(rename = "Class")]
        name: String,
        #[tabled(rename = "Average Attendance")]
        rate: String,
    }

    let comparison = stats.class_trends.iter().map(|trend| ComparisonRow {
        code: trend.code.clone(),
        name: trend.name.clone(),
        rate: rate(trend.avg_attendance),
    });
    println!("Class comparison:\n{}", modern(Table::new(comparison)));

    let ranking = stats
        .top_performers(analytics.top_performers)
        .into_iter()
        .enumerate()
        .map(|(i, trend)| RankRow {
            rank: i + 1,
            name: trend.name.clone(),
            subject: trend.subject.clone(),
            rate: rate(trend.avg_attendance),
        });
    println!("Top performers:\n{}", modern(Table::new(ranking)));
}

/// Pretty prints the classes `identity` can see, or only those matching `search`.
pub fn show_classes(manager: &AttendanceManager, identity: &Identity, search: Option<&str>) {
    let classes = manager.search_classes(identity, search.unwrap_or_default());

    if classes.is_empty() {
        match search {
            Some(term) if !term.trim().is_empty() => println!("No classes match \"{term}\""),
            _ => println!("No classes assigned to {}.", identity.name),
        }
        return;
    }

    let rows = classes.into_iter().map(ClassRow::from);
    println!("Classes:\n{}", modern(Table::new(rows)));
}

/// Prints all info about a class, including its attendance rate, roster and attendance history.
pub fn show_class(
    manager: &AttendanceManager,
    identity: &Identity,
    class_id: &str,
) -> Result<()> {
    let class = manager.get_class(class_id)?;
    if !identity.can_view(class) {
        return Err(ValidationError::UnknownClass(class_id.to_string()).into());
    }

    println!("{} ({})", class.name, class.code);
    println!("Subject:  {}", class.subject);
    println!("Schedule: {}", class.schedule);
    println!("Faculty:  {}", class.faculty);
    println!("Students: {}", class.total_students);
    println!("Attendance rate: {}", rate(manager.class_rate(class_id).ok()));

    let roster = manager.get_class_roster(class_id)?;
    let rows = roster.into_iter().map(StudentRow::from);
    println!("Roster:\n{}", modern(Table::new(rows)));

    let history = manager.history(Some(class_id));
    if history.is_empty() {
        println!("No attendance has been taken for this class yet.");
    } else {
        println!("Attendance history:\n{}", history_table(manager, &history));
    }

    Ok(())
}

/// Pretty prints every student, or only those matching `search`.
pub fn show_students(manager: &AttendanceManager, search: Option<&str>) {
    let students = manager.search_students(search.unwrap_or_default());

    if students.is_empty() {
        match search {
            Some(term) if !term.trim().is_empty() => println!("No students match \"{term}\""),
            _ => println!("There are no students yet."),
        }
        return;
    }

    let rows = students.into_iter().map(StudentRow::from);
    println!("Students:\n{}", modern(Table::new(rows)));
}

/// Pretty prints the attendance history `identity` can see, most recent first.
pub fn show_history(
    manager: &AttendanceManager,
    identity: &Identity,
    class_id: Option<&str>,
) -> Result<()> {
    if let Some(id) = class_id {
        manager.get_class(id)?;
    }

    let history = manager.visible_history(identity, class_id);
    if history.is_empty() {
        println!("No attendance records found.");
        return Ok(());
    }

    println!("Attendance history:\n{}", history_table(manager, &history));
    Ok(())
}

/// Pretty prints a single attendance record.
pub fn show_record(manager: &AttendanceManager, record: &AttendanceRecord) {
    println!("{}", history_table(manager, &[record]));

    if !record.absent_students.is_empty() {
        let absent: Vec<&str> = record
            .absent_students
            .iter()
            .map(|id| {
                manager
                    .get_student(id)
                    .map_or(id.as_str(), |student| student.name.as_str())
            })
            .collect();
        println!("Absent: {}", absent.join(", "));
    }
}
