use crate::domain::TimetableEntry;
use crate::infrastructure::InsertHook;
use anyhow::Result;
use log::info;

/// Plugin that records every new appointment in the application log
pub struct AuditLogHook;

impl InsertHook for AuditLogHook {
    fn on_entry_added(&self, entry: &TimetableEntry) -> Result<()> {
        info!(
            target: "timetable::audit",
            "record {} added for doctor {}: {} on {} at {} ({})",
            entry.id,
            entry.doctor_id,
            entry.client_surname,
            entry.date,
            entry.time.format("%H:%M"),
            entry.status
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "Audit Log"
    }
}
