//! Attendance rates, trends and rankings derived from attendance records.
//!
//! Nothing here is cached: every function walks the records it is given. All percentages are
//! rounded to one decimal place, and an empty input is reported as missing data rather than as a
//! rate of zero.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceRecord, Class, ClassId};

/// The attendance rate across every class that met on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub attendance_rate: f64,
}

/// The average attendance rate of a class over all of its records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTrend {
    pub class_id: ClassId,
    pub name: String,
    pub code: String,
    pub subject: String,
    /// `None` when the class has no attendance records yet.
    pub avg_attendance: Option<f64>,
}

/// The difference between two attendance rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Change {
    pub value: f64,
    pub is_positive: bool,
}

/// Rounds a percentage to one decimal place.
pub fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean attendance rate of the given records, skipping records with nobody in them.
pub fn average_rate<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Option<f64> {
    let (sum, count) = records
        .into_iter()
        .filter_map(AttendanceRecord::attendance_rate)
        .fold((0.0, 0usize), |(sum, count), rate| (sum + rate, count + 1));

    if count == 0 {
        return None;
    }

    Some(round_one(sum / count as f64))
}

/// The average attendance rate of one class.
pub fn class_rate<'a>(
    class: &Class,
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> Result<f64> {
    average_rate(
        records
            .into_iter()
            .filter(|record| record.class_id == class.id),
    )
    .ok_or_else(|| AttendanceError::NoData(format!("class '{}'", class.code)))
}

/// One [`ClassTrend`] per class, in the order the classes are given.
pub fn class_trends<'a>(
    classes: &[Class],
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> Vec<ClassTrend> {
    let mut by_class: HashMap<&str, Vec<&AttendanceRecord>> = HashMap::new();
    for record in records {
        by_class
            .entry(record.class_id.as_str())
            .or_default()
            .push(record);
    }

    classes
        .iter()
        .map(|class| ClassTrend {
            class_id: class.id.clone(),
            name: class.name.clone(),
            code: class.code.clone(),
            subject: class.subject.clone(),
            avg_attendance: by_class
                .get(class.id.as_str())
                .and_then(|records| average_rate(records.iter().copied())),
        })
        .collect()
}

/// The first day of a window of `days` days ending on `end`.
fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end.checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// The daily attendance rate for each of the `days` days ending on `end`, oldest first.
///
/// Days on which no class met are left out entirely rather than reported as 0%.
pub fn daily_trends<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    end: NaiveDate,
    days: u32,
) -> Vec<DailyTrend> {
    if days == 0 {
        return Vec::new();
    }
    let start = window_start(end, days);

    let mut by_day: BTreeMap<NaiveDate, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        if (start..=end).contains(&record.date) {
            by_day.entry(record.date).or_default().push(record);
        }
    }

    by_day
        .into_iter()
        .filter_map(|(date, records)| {
            average_rate(records).map(|attendance_rate| DailyTrend {
                date,
                attendance_rate,
            })
        })
        .collect()
}

/// The change from `previous` to `latest`. A rate that held steady counts as positive.
pub fn delta(previous: f64, latest: f64) -> Change {
    Change {
        value: round_one(latest - previous),
        is_positive: latest >= previous,
    }
}

/// The change between the last two rates of a chronological series.
pub fn series_change(rates: &[f64]) -> Result<Change> {
    match rates {
        [.., previous, latest] => Ok(delta(*previous, *latest)),
        _ => Err(AttendanceError::InsufficientData {
            needed: 2,
            found: rates.len(),
        }),
    }
}

/// The change between the two most recent days of a daily trend.
pub fn attendance_change(trends: &[DailyTrend]) -> Result<Change> {
    let rates: Vec<f64> = trends.iter().map(|trend| trend.attendance_rate).collect();
    series_change(&rates)
}

/// The `n` classes with the highest average attendance, best first.
///
/// Classes with equal rates keep the order they were given in. Classes without any records are
/// not ranked.
pub fn top_performers(trends: &[ClassTrend], n: usize) -> Vec<&ClassTrend> {
    let mut ranked: Vec<(&ClassTrend, f64)> = trends
        .iter()
        .filter_map(|trend| trend.avg_attendance.map(|rate| (trend, rate)))
        .collect();

    // `sort_by` is stable, which is what breaks ties.
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    ranked.into_iter().take(n).map(|(trend, _)| trend).collect()
}

/// Percentage of student-records marked absent over the `days` days ending on `end`.
pub fn absentee_rate<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    end: NaiveDate,
    days: u32,
) -> Result<f64> {
    let start = window_start(end, days);

    let (absent, total) = records
        .into_iter()
        .filter(|record| days > 0 && (start..=end).contains(&record.date))
        .fold((0usize, 0usize), |(absent, total), record| {
            (absent + record.absent_count(), total + record.total_students)
        });

    if total == 0 {
        return Err(AttendanceError::NoData(format!(
            "the {days} days ending {end}"
        )));
    }

    Ok(round_one(absent as f64 / total as f64 * 100.0))
}

/// Everything the dashboard and analytics views show, computed in one pass over the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub class_trends: Vec<ClassTrend>,
    pub daily_trends: Vec<DailyTrend>,
}

impl AttendanceStats {
    pub fn compute<'a, I>(classes: &[Class], records: I, end: NaiveDate, window_days: u32) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord> + Clone,
    {
        Self {
            class_trends: class_trends(classes, records.clone()),
            daily_trends: daily_trends(records, end, window_days),
        }
    }

    /// The most recent daily rate, if any class met during the window.
    pub fn latest_rate(&self) -> Option<f64> {
        self.daily_trends.last().map(|trend| trend.attendance_rate)
    }

    pub fn change(&self) -> Result<Change> {
        attendance_change(&self.daily_trends)
    }

    pub fn top_performers(&self, n: usize) -> Vec<&ClassTrend> {
        top_performers(&self.class_trends, n)
    }
}
