use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Reporting period a transaction falls in.
///
/// Keys order chronologically; dates that could not be read collect in the
/// `Invalid` bucket, which sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MonthKey {
    Month { year: i32, month: u32 },
    Invalid,
}

impl MonthKey {
    pub fn from_date_field(raw: Option<&str>) -> Self {
        match raw.and_then(parse_calendar_date) {
            Some(date) => Self::Month {
                year: date.year(),
                month: date.month(),
            },
            None => Self::Invalid,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{year}-{month}"),
            Self::Invalid => f.write_str("invalid-date"),
        }
    }
}

/// Accumulated transaction amounts per [`MonthKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyRevenue {
    buckets: BTreeMap<MonthKey, f64>,
}

impl MonthlyRevenue {
    pub fn add(&mut self, key: MonthKey, amount: f64) {
        *self.buckets.entry(key).or_insert(0.0) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &f64)> {
        self.buckets.iter()
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date_time.date());
        }
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.date_naive());
    }

    // Bare `YYYY-MM` means the first of that month.
    if value.len() == 7 && value.as_bytes().get(4) == Some(&b'-') {
        return NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok();
    }

    None
}
