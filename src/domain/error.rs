use crate::domain::EntryId;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("timetable record {0} does not exist")]
    NotFound(EntryId),
    #[error("incorrect day {0}: expected a value between 1 and 31")]
    InvalidDay(i32),
    #[error("incorrect month {0}: expected a value between 1 and 12")]
    InvalidMonth(i32),
    #[error("incorrect year {0}: expected 2022 or later")]
    InvalidYear(i32),
    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[source] BoxError),
    #[error("value not storable: {0}")]
    UnsupportedValue(String),
    #[error("malformed timetable row: {0}")]
    MalformedRow(String),
    #[error("failed to apply migration {name}: {reason}")]
    Migration { name: String, reason: String },
}

impl TimetableError {
    pub fn store(err: impl Into<BoxError>) -> Self {
        Self::StoreUnavailable(err.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDay(_)
                | Self::InvalidMonth(_)
                | Self::InvalidYear(_)
                | Self::UnsupportedValue(_)
        )
    }
}

impl From<duckdb::Error> for TimetableError {
    fn from(value: duckdb::Error) -> Self {
        Self::StoreUnavailable(Box::new(value))
    }
}

pub type TimetableResult<T> = Result<T, TimetableError>;
