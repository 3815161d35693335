/// Test utilities for DuckDB-based tests
///
/// Every `TestStorage` owns a fresh database file inside a temporary
/// directory, so tests never observe each other's rows.
///
/// ```rust,ignore
/// let test_storage = TestStorage::new();
/// let service = test_storage.service();
/// // database is removed when test_storage is dropped
/// ```
#[cfg(test)]
pub mod test_harness {
    use crate::domain::{
        DoctorId, NewTimetableEntry, RecordStatus, TimetableEntry, TimetableQueryService,
        TimetableResult,
    };
    use crate::infrastructure::{DuckDbStorage, RecordStore};
    use chrono::{NaiveDate, NaiveTime};
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub struct TestStorage {
        pub storage: DuckDbStorage,
        _temp_dir: TempDir, // Keep temp dir alive
    }

    impl TestStorage {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp directory");
            let db_path = temp_dir.path().join("test.db");

            let storage =
                DuckDbStorage::new(&db_path).expect("Failed to initialize test DuckDB storage");

            Self {
                storage,
                _temp_dir: temp_dir,
            }
        }

        pub fn storage(&self) -> &DuckDbStorage {
            &self.storage
        }

        pub fn service(&self) -> TimetableQueryService<&DuckDbStorage> {
            TimetableQueryService::new(&self.storage)
        }

        pub fn db_path(&self) -> PathBuf {
            self._temp_dir.path().join("test.db")
        }

        /// Store a confirmed 09:00 appointment directly, bypassing the service.
        pub fn create_entry(
            &self,
            surname: &str,
            date: NaiveDate,
            doctor_id: DoctorId,
        ) -> TimetableResult<TimetableEntry> {
            let time = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
            let new_entry = NewTimetableEntry::new(surname, date, time, doctor_id);
            let id = self
                .storage
                .insert_entry(&new_entry, RecordStatus::Confirmed)?;
            Ok(new_entry.into_entry(id, RecordStatus::Confirmed))
        }
    }

    pub fn with_test_storage<F, R>(test_fn: F) -> R
    where
        F: FnOnce(&TestStorage) -> R,
    {
        let test_storage = TestStorage::new();
        test_fn(&test_storage)
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;
    use crate::infrastructure::{Criterion, RecordStore, TimetableQuery};
    use chrono::NaiveDate;

    #[test]
    fn test_harness_basic_functionality() {
        let test_storage = TestStorage::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert_eq!(test_storage.storage().count_entries().unwrap(), 0);

        let entry = test_storage.create_entry("Smith", date, 4).unwrap();

        let loaded = test_storage
            .storage()
            .select_entries(&TimetableQuery::new().and(Criterion::Id(entry.id)))
            .unwrap();
        assert_eq!(loaded, vec![entry]);
    }

    #[test]
    fn test_harness_with_function() {
        with_test_storage(|test_storage| {
            let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
            test_storage.create_entry("Smith", date, 4).unwrap();
            assert_eq!(test_storage.storage().count_entries().unwrap(), 1);
        });
    }

    #[test]
    fn test_harness_isolation() {
        let test_storage1 = TestStorage::new();
        let test_storage2 = TestStorage::new();

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        test_storage1.create_entry("Smith", date, 4).unwrap();

        assert_eq!(test_storage2.storage().count_entries().unwrap(), 0);
    }
}
