use crate::domain::TimetableEntry;
use anyhow::Result;
use log::warn;

/// Trait for plugins that respond to new timetable entries
pub trait InsertHook: Send + Sync {
    /// Called after an entry has been stored
    fn on_entry_added(&self, entry: &TimetableEntry) -> Result<()>;

    /// Human-readable name for this hook
    fn name(&self) -> &str;
}

/// Registry for managing insert hooks
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn InsertHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register<H>(&mut self, hook: H)
    where
        H: InsertHook + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Run every hook in registration order. A failing hook never undoes
    /// the insert.
    pub fn execute_insert_hooks(&self, entry: &TimetableEntry) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_entry_added(entry) {
                warn!("hook '{}' failed for record {}: {e:#}", hook.name(), entry.id);
            }
        }
    }

    pub fn list_hooks(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
