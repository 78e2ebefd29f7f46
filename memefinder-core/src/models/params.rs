use chrono::{Days, NaiveDate};
use thiserror::Error;

pub const DAYS_BACK_MIN: u32 = 1;
pub const DAYS_BACK_MAX: u32 = 30;
pub const DAYS_BACK_DEFAULT: u32 = 14;

pub const MAX_MEMES_MIN: u32 = 1;
pub const MAX_MEMES_MAX: u32 = 50;
pub const MAX_MEMES_DEFAULT: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
}

/// Validated inputs for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    days_back: u32,
    max_memes: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            days_back: DAYS_BACK_DEFAULT,
            max_memes: MAX_MEMES_DEFAULT,
        }
    }
}

impl RunParams {
    pub fn new(days_back: i64, max_memes: i64) -> Result<Self, ParamsError> {
        Ok(Self {
            days_back: check_range("days_back", days_back, DAYS_BACK_MIN, DAYS_BACK_MAX)?,
            max_memes: check_range("max_memes", max_memes, MAX_MEMES_MIN, MAX_MEMES_MAX)?,
        })
    }

    /// Build from raw query-string values. Absent values take the defaults.
    pub fn from_query(days_back: Option<&str>, max_memes: Option<&str>) -> Result<Self, ParamsError> {
        let days_back = parse_int("days_back", days_back, DAYS_BACK_DEFAULT)?;
        let max_memes = parse_int("max_memes", max_memes, MAX_MEMES_DEFAULT)?;
        Self::new(days_back, max_memes)
    }

    pub fn days_back(&self) -> u32 {
        self.days_back
    }

    pub fn max_memes(&self) -> u32 {
        self.max_memes
    }

    /// Earliest date still considered recent: `today - days_back`.
    pub fn cutoff_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days_back)))
            .unwrap_or(NaiveDate::MIN)
    }
}

fn parse_int(field: &'static str, raw: Option<&str>, default: u32) -> Result<i64, ParamsError> {
    match raw {
        None => Ok(i64::from(default)),
        Some(s) => s.trim().parse::<i64>().map_err(|_| ParamsError::NotAnInteger {
            field,
            value: s.to_string(),
        }),
    }
}

fn check_range(field: &'static str, value: i64, min: u32, max: u32) -> Result<u32, ParamsError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ParamsError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value as u32)
}
