use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::RowId;

pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("unrecognized scale value: {0:?}")]
    UnrecognizedScale(String),

    #[error("no row with id {0}")]
    UnknownRow(RowId),

    #[error("row {0} is locked and cannot be moved")]
    RowLocked(RowId),

    #[error("row {0} has no gesture in progress")]
    NoActiveGesture(RowId),

    #[error("interval end {end} must be after start {start}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
