use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesReportError};
use crate::schema::{SalesRecord, TimeGranularity};

/// A calendar quarter. Ordering is by `(year, number)`, never by the display
/// label, so quarters compare correctly across year-digit boundaries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Quarter {
    pub year: i32,
    /// 1 through 4.
    pub number: u32,
}

impl Quarter {
    pub fn new(year: i32, number: u32) -> Result<Self> {
        if !(1..=4).contains(&number) {
            return Err(SalesReportError::InvalidQuarterLabel(format!(
                "{}Q{}",
                year, number
            )));
        }
        Ok(Self { year, number })
    }

    /// The quarter a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: (date.month() - 1) / 3 + 1,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        let month = 3 * (self.number - 1) + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap()
    }

    /// Fixed month/day boundaries: Mar 31, Jun 30, Sep 30, Dec 31. Quarter
    /// ends never land on Feb 29, so no leap handling is needed.
    pub fn end_date(&self) -> NaiveDate {
        let (month, day) = match self.number {
            1 => (3, 31),
            2 => (6, 30),
            3 => (9, 30),
            _ => (12, 31),
        };
        NaiveDate::from_ymd_opt(self.year, month, day).unwrap()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.number)
    }
}

impl FromStr for Quarter {
    type Err = SalesReportError;

    fn from_str(label: &str) -> Result<Self> {
        let invalid = || SalesReportError::InvalidQuarterLabel(label.to_string());

        let (year_part, number_part) = label.split_once('Q').ok_or_else(invalid)?;
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let number: u32 = number_part.parse().map_err(|_| invalid())?;
        Quarter::new(year, number)
    }
}

/// A typed period label for time-series grouping. Display strings are
/// derived; ordering always goes through the true start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter(Quarter),
}

impl Period {
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1).unwrap(),
            Period::Quarter(quarter) => quarter.start_date(),
        }
    }

    fn sort_key(&self) -> (NaiveDate, u8) {
        let rank = match self {
            Period::Quarter(_) => 0,
            Period::Month { .. } => 1,
        };
        (self.start_date(), rank)
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{}-{:02}", year, month),
            Period::Quarter(quarter) => quarter.fmt(f),
        }
    }
}

/// The period a date falls in at the requested granularity.
pub fn period_of(date: NaiveDate, granularity: TimeGranularity) -> Period {
    match granularity {
        TimeGranularity::Month => Period::Month {
            year: date.year(),
            month: date.month(),
        },
        TimeGranularity::Quarter => Period::Quarter(Quarter::containing(date)),
    }
}

/// Whole days between `as_of` and the end of its quarter. Never negative.
pub fn days_left_in_quarter(as_of: NaiveDate) -> i64 {
    let end = Quarter::containing(as_of).end_date();
    if as_of <= end {
        (end - as_of).num_days()
    } else {
        0
    }
}

/// 1-based seven-day week index of a date within its quarter.
pub fn week_of_quarter(date: NaiveDate) -> u32 {
    let start = Quarter::containing(date).start_date();
    ((date - start).num_days() / 7 + 1) as u32
}

/// Unique quarters present among the records, ascending. Empty input gives
/// an empty vec.
pub fn available_quarters(records: &[SalesRecord]) -> Vec<Quarter> {
    let quarters: BTreeSet<Quarter> = records
        .iter()
        .map(|r| Quarter::containing(r.date))
        .collect();
    quarters.into_iter().collect()
}

/// The dashboard's default selection: the last four available quarters, or
/// all of them when fewer exist.
pub fn default_quarter_selection(available: &[Quarter]) -> Vec<Quarter> {
    let skip = available.len().saturating_sub(4);
    available[skip..].to_vec()
}
