//! Weekly sales projection calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Canonical English weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Canonical English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Weekday name of a calendar date.
pub fn weekday_name_of(date: NaiveDate) -> &'static str {
    weekday_name(date.weekday())
}

/// Parse a canonical weekday name (case-insensitive).
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let index = WEEKDAY_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name.trim()))?;
    Weekday::try_from(index as u8).ok()
}

/// Projected sales per weekday, in currency units.
///
/// Always holds exactly seven entries; a weekday missing from persisted data
/// loads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesProjectionCalendar {
    #[serde(rename = "Monday")]
    monday: f64,
    #[serde(rename = "Tuesday")]
    tuesday: f64,
    #[serde(rename = "Wednesday")]
    wednesday: f64,
    #[serde(rename = "Thursday")]
    thursday: f64,
    #[serde(rename = "Friday")]
    friday: f64,
    #[serde(rename = "Saturday")]
    saturday: f64,
    #[serde(rename = "Sunday")]
    sunday: f64,
}

impl SalesProjectionCalendar {
    /// Calendar with every day at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Calendar from Monday-first daily figures.
    pub fn from_days(days: [f64; 7]) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }

    /// Standard weekly projection for a new store.
    pub fn defaults() -> Self {
        Self::from_days([10_000.0, 10_000.0, 10_000.0, 12_000.0, 14_000.0, 13_000.0, 11_000.0])
    }

    pub fn get(&self, day: Weekday) -> f64 {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn set(&mut self, day: Weekday, sales: f64) {
        let slot = match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = if sales.is_finite() { sales } else { 0.0 };
    }

    /// Projected sales for the weekday of `date`.
    pub fn for_date(&self, date: NaiveDate) -> f64 {
        self.get(date.weekday())
    }

    /// `(weekday name, sales)` pairs, Monday first.
    pub fn days(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        WEEKDAY_NAMES.iter().enumerate().map(move |(i, name)| {
            let day = Weekday::try_from(i as u8).unwrap_or(Weekday::Mon);
            (*name, self.get(day))
        })
    }
}
