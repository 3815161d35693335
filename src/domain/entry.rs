use crate::domain::TimetableError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type EntryId = i64;
pub type DoctorId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Confirmed,
    Cancelled,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Confirmed => "CONFIRMED",
            RecordStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CONFIRMED" => Ok(RecordStatus::Confirmed),
            "CANCELLED" => Ok(RecordStatus::Cancelled),
            other => Err(TimetableError::MalformedRow(format!(
                "unknown record status '{other}'"
            ))),
        }
    }
}

/// A scheduled appointment as stored in the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: EntryId,
    pub client_surname: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub doctor_id: DoctorId,
    pub status: RecordStatus,
}

impl TimetableEntry {
    pub fn is_cancelled(&self) -> bool {
        self.status == RecordStatus::Cancelled
    }
}

/// Insert payload. The identifier and status are decided by the store and
/// the service respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimetableEntry {
    pub client_surname: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub doctor_id: DoctorId,
}

impl NewTimetableEntry {
    pub fn new(
        client_surname: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        doctor_id: DoctorId,
    ) -> Self {
        Self {
            client_surname: client_surname.into(),
            date,
            time,
            doctor_id,
        }
    }

    pub fn into_entry(self, id: EntryId, status: RecordStatus) -> TimetableEntry {
        TimetableEntry {
            id,
            client_surname: self.client_surname,
            date: self.date,
            time: self.time,
            doctor_id: self.doctor_id,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_stored_text() {
        assert_eq!("CONFIRMED".parse::<RecordStatus>().unwrap(), RecordStatus::Confirmed);
        assert_eq!(" CANCELLED ".parse::<RecordStatus>().unwrap(), RecordStatus::Cancelled);
        assert!(matches!(
            "PENDING".parse::<RecordStatus>(),
            Err(TimetableError::MalformedRow(_))
        ));
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&RecordStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn new_entry_keeps_fields_when_promoted() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 10).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let entry = NewTimetableEntry::new("Smith", date, time, 7).into_entry(3, RecordStatus::Confirmed);

        assert_eq!(entry.id, 3);
        assert_eq!(entry.client_surname, "Smith");
        assert_eq!(entry.date, date);
        assert_eq!(entry.time, time);
        assert_eq!(entry.doctor_id, 7);
        assert!(!entry.is_cancelled());
    }
}
