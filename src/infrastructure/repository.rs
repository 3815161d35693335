use crate::domain::{EntryId, NewTimetableEntry, RecordStatus, TimetableEntry, TimetableResult};
use crate::infrastructure::TimetableQuery;
use std::sync::Arc;

/// Backing store the timetable service executes against.
pub trait RecordStore {
    /// Insert one row and return the identifier the store assigned to it.
    fn insert_entry(&self, entry: &NewTimetableEntry, status: RecordStatus)
    -> TimetableResult<EntryId>;

    /// Run a select and materialize every matching row.
    fn select_entries(&self, query: &TimetableQuery) -> TimetableResult<Vec<TimetableEntry>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn insert_entry(
        &self,
        entry: &NewTimetableEntry,
        status: RecordStatus,
    ) -> TimetableResult<EntryId> {
        (**self).insert_entry(entry, status)
    }

    fn select_entries(&self, query: &TimetableQuery) -> TimetableResult<Vec<TimetableEntry>> {
        (**self).select_entries(query)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn insert_entry(
        &self,
        entry: &NewTimetableEntry,
        status: RecordStatus,
    ) -> TimetableResult<EntryId> {
        (**self).insert_entry(entry, status)
    }

    fn select_entries(&self, query: &TimetableQuery) -> TimetableResult<Vec<TimetableEntry>> {
        (**self).select_entries(query)
    }
}
