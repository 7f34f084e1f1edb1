//! Sprint and release naming from calendar dates.
//!
//! Sprints start on Mondays. Two-week sprints begin in odd ISO weeks, so a
//! date in an even week belongs to the sprint named after the previous week.

use chrono::{Datelike, Duration, NaiveDate};

/// A named sprint with its start and end timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintWindow {
    /// Sprint name, `yyWww`.
    pub name: String,
    /// Sprint start, `%Y/%m/%d 12:00`.
    pub start: String,
    /// Sprint end, `%Y/%m/%d 12:00`.
    pub end: String,
}

/// A cadence release name with its release date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceRelease {
    /// Fix version name, `yyww`.
    pub name: String,
    /// Release date (the Friday closing the cadence), `%Y-%m-%d`.
    pub date: String,
}

fn stamp(date: NaiveDate) -> String {
    date.format("%Y/%m/%d 12:00").to_string()
}

/// Names the two-week sprint containing `date` and returns its bounds.
#[must_use]
pub fn two_week_sprint(date: NaiveDate) -> SprintWindow {
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let week = date.iso_week().week();

    // Even weeks are the second week of a sprint; the name comes from the
    // week before.
    let anchor = if week % 2 == 1 { date } else { date - Duration::weeks(1) };
    let iso = anchor.iso_week();
    let start = anchor - Duration::days(weekday);
    SprintWindow {
        name: format!("{:02}W{:02}", iso.year() % 100, iso.week()),
        start: stamp(start),
        end: stamp(start + Duration::weeks(2)),
    }
}

/// Names the one-week sprint containing `date` and returns its bounds.
#[must_use]
pub fn one_week_sprint(date: NaiveDate) -> SprintWindow {
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let iso = date.iso_week();
    let start = date - Duration::days(weekday);
    SprintWindow {
        name: format!("{:02}W{:02}", iso.year() % 100, iso.week()),
        start: stamp(start),
        end: stamp(start + Duration::weeks(1)),
    }
}

/// Names the biweekly cadence fix version for `date` and the Friday it
/// releases on.
#[must_use]
pub fn cadence_fixversion(date: NaiveDate) -> CadenceRelease {
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let week = date.iso_week().week();

    // The deadline falls in the even week; an odd week looks one week ahead.
    let anchored = if week % 2 == 1 { date + Duration::weeks(1) } else { date };
    let release = anchored + Duration::days(4 - weekday);
    CadenceRelease {
        name: format!(
            "{:02}{:02}",
            anchored.iso_week().year() % 100,
            anchored.iso_week().week()
        ),
        date: release.format("%Y-%m-%d").to_string(),
    }
}
