use crate::domain::{
    CriterionPolicy, DatePart, DoctorId, EntryId, NewTimetableEntry, RecordStatus,
    TimetableEntry, TimetableError, TimetableResult, validate_day, validate_month, validate_year,
};
use crate::infrastructure::{Criterion, HookRegistry, RecordStore, TimetableQuery};
use log::debug;

/// Translates timetable filters into store queries. Holds no state between
/// calls apart from its configuration.
pub struct TimetableQueryService<S> {
    store: S,
    policy: CriterionPolicy,
    hooks: HookRegistry,
}

impl<S: RecordStore> TimetableQueryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: CriterionPolicy::default(),
            hooks: HookRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: CriterionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> CriterionPolicy {
        self.policy
    }

    /// Store a new appointment as CONFIRMED and return its identifier.
    pub fn add_entry(&self, entry: NewTimetableEntry) -> TimetableResult<EntryId> {
        let id = self.store.insert_entry(&entry, RecordStatus::Confirmed)?;

        if !self.hooks.is_empty() {
            self.hooks
                .execute_insert_hooks(&entry.into_entry(id, RecordStatus::Confirmed));
        }
        Ok(id)
    }

    /// Look up a record that has not been cancelled.
    pub fn get_entry_by_id(&self, id: EntryId) -> TimetableResult<TimetableEntry> {
        let query = TimetableQuery::new()
            .and(Criterion::Id(id))
            .and(Criterion::NotCancelled);

        self.store
            .select_entries(&query)?
            .into_iter()
            .next()
            .ok_or(TimetableError::NotFound(id))
    }

    /// Filter a doctor's records by whichever of day, month and year the
    /// criterion policy accepts. Never rejects its inputs.
    pub fn get_entries_by_flexible_date(
        &self,
        doctor_id: DoctorId,
        day: i32,
        month: i32,
        year: i32,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let query = self.flexible_date_query(doctor_id, day, month, year);
        debug!(
            "flexible date query ({} policy): {:?}",
            self.policy,
            query.params()
        );
        self.store.select_entries(&query)
    }

    pub fn get_entries_by_day(
        &self,
        doctor_id: DoctorId,
        day: i32,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let day = validate_day(day)?;
        self.select_by_part(doctor_id, DatePart::Day, day)
    }

    pub fn get_entries_by_month(
        &self,
        doctor_id: DoctorId,
        month: i32,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let month = validate_month(month)?;
        self.select_by_part(doctor_id, DatePart::Month, month)
    }

    pub fn get_entries_by_year(
        &self,
        doctor_id: DoctorId,
        year: i32,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let year = validate_year(year)?;
        self.select_by_part(doctor_id, DatePart::Year, year)
    }

    /// Every record of the doctor, cancelled ones included.
    pub fn get_all_entries_for_doctor(
        &self,
        doctor_id: DoctorId,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let query = TimetableQuery::new().and(Criterion::DoctorId(doctor_id));
        self.store.select_entries(&query)
    }

    fn flexible_date_query(
        &self,
        doctor_id: DoctorId,
        day: i32,
        month: i32,
        year: i32,
    ) -> TimetableQuery {
        let mut query = TimetableQuery::new();
        if self.policy.includes_day(day) {
            query.push(Criterion::DatePart(DatePart::Day, day));
        }
        if self.policy.includes_month(month) {
            query.push(Criterion::DatePart(DatePart::Month, month));
        }
        if self.policy.includes_year(year) {
            query.push(Criterion::DatePart(DatePart::Year, year));
        }
        query.and(Criterion::DoctorId(doctor_id))
    }

    fn select_by_part(
        &self,
        doctor_id: DoctorId,
        part: DatePart,
        value: i32,
    ) -> TimetableResult<Vec<TimetableEntry>> {
        let query = TimetableQuery::new()
            .and(Criterion::DatePart(part, value))
            .and(Criterion::DoctorId(doctor_id));
        self.store.select_entries(&query)
    }
}
