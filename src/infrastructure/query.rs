use crate::domain::{DatePart, DoctorId, EntryId, RecordStatus};

pub const TIMETABLE_TABLE: &str = "doctor_timetable";

/// Column list shared by every select. Dates and times come back as ISO
/// text and are parsed when the row is mapped.
pub const SELECT_COLUMNS: &str = "id, client_surname, \
    CAST(appointment_date AS VARCHAR), CAST(appointment_time AS VARCHAR), \
    doctor_id, status";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Id(EntryId),
    NotCancelled,
    DatePart(DatePart, i32),
    DoctorId(DoctorId),
}

impl Criterion {
    fn sql(&self) -> String {
        match self {
            Criterion::Id(_) => "id = ?".to_string(),
            Criterion::NotCancelled => {
                format!("status <> '{}'", RecordStatus::Cancelled.as_str())
            }
            Criterion::DatePart(part, _) => {
                format!("EXTRACT({} FROM appointment_date) = ?", part.sql_field())
            }
            Criterion::DoctorId(_) => "doctor_id = ?".to_string(),
        }
    }

    fn param(&self) -> Option<i64> {
        match self {
            Criterion::Id(id) => Some(*id),
            Criterion::NotCancelled => None,
            Criterion::DatePart(_, value) => Some(i64::from(*value)),
            Criterion::DoctorId(id) => Some(*id),
        }
    }
}

/// An ordered conjunction of criteria against the timetable table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableQuery {
    criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<i64>,
}

impl TimetableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn push(&mut self, criterion: Criterion) -> &mut Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn params(&self) -> Vec<i64> {
        self.criteria.iter().filter_map(Criterion::param).collect()
    }

    pub fn to_statement(&self) -> Statement {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM {TIMETABLE_TABLE}");
        if !self.criteria.is_empty() {
            let clauses: Vec<String> = self.criteria.iter().map(Criterion::sql).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        Statement {
            sql,
            params: self.params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lookup_by_id_without_binding_status() {
        let statement = TimetableQuery::new()
            .and(Criterion::Id(42))
            .and(Criterion::NotCancelled)
            .to_statement();

        assert!(
            statement
                .sql
                .ends_with("WHERE id = ? AND status <> 'CANCELLED' ORDER BY id")
        );
        assert_eq!(statement.params, vec![42]);
    }

    #[test]
    fn params_follow_append_order() {
        let statement = TimetableQuery::new()
            .and(Criterion::DatePart(DatePart::Month, 5))
            .and(Criterion::DatePart(DatePart::Year, 2023))
            .and(Criterion::DoctorId(7))
            .to_statement();

        assert!(statement.sql.contains(
            "WHERE EXTRACT(MONTH FROM appointment_date) = ? \
             AND EXTRACT(YEAR FROM appointment_date) = ? AND doctor_id = ?"
        ));
        assert_eq!(statement.params, vec![5, 2023, 7]);
    }

    #[test]
    fn placeholder_count_matches_params() {
        let mut query = TimetableQuery::new();
        query
            .push(Criterion::DatePart(DatePart::Day, 10))
            .push(Criterion::NotCancelled)
            .push(Criterion::DoctorId(3));
        let statement = query.to_statement();

        assert_eq!(statement.sql.matches('?').count(), statement.params.len());
    }

    #[test]
    fn empty_query_has_no_where_clause() {
        let statement = TimetableQuery::new().to_statement();
        assert!(!statement.sql.contains("WHERE"));
        assert!(statement.params.is_empty());
    }
}
