use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Controls what granularity the timeline header displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Day,
    #[default]
    Month,
    Year,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::Day, Scale::Month, Scale::Year];

    pub fn name(self) -> &'static str {
        match self {
            Scale::Day => "day",
            Scale::Month => "month",
            Scale::Year => "year",
        }
    }

    /// Start of the bucket (day, month, or year) containing `at`.
    pub fn align(self, at: NaiveDateTime) -> NaiveDateTime {
        let date = at.date();
        let aligned = match self {
            Scale::Day => date,
            Scale::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
            Scale::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        };
        aligned.and_time(NaiveTime::MIN)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Scale::Day),
            "month" => Ok(Scale::Month),
            "year" => Ok(Scale::Year),
            _ => Err(ScheduleError::UnrecognizedScale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn align_snaps_to_bucket_start() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 17)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(Scale::Day.align(t), midnight(2024, 3, 17));
        assert_eq!(Scale::Month.align(t), midnight(2024, 3, 1));
        assert_eq!(Scale::Year.align(t), midnight(2024, 1, 1));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Month".parse::<Scale>().unwrap(), Scale::Month);
        assert_eq!(" YEAR ".parse::<Scale>().unwrap(), Scale::Year);
        assert_eq!("day".parse::<Scale>().unwrap(), Scale::Day);
    }

    #[test]
    fn unknown_scale_is_rejected() {
        let err = "week".parse::<Scale>().unwrap_err();
        assert!(matches!(err, ScheduleError::UnrecognizedScale(ref s) if s == "week"));
    }
}
