use crate::application::Config;
use crate::domain::{EntryId, RecordStatus, TimetableQueryService};
use crate::infrastructure::{AuditLogHook, DuckDbStorage, HookRegistry};
use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

pub struct TimetableApp {
    storage: Arc<DuckDbStorage>,
    service: TimetableQueryService<Arc<DuckDbStorage>>,
}

impl TimetableApp {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_default_plugins(config)
    }

    pub fn with_default_plugins(config: Config) -> Result<Self> {
        let mut hook_registry = HookRegistry::new();
        hook_registry.register(AuditLogHook);

        Self::open(config, hook_registry)
    }

    pub fn without_plugins(config: Config) -> Result<Self> {
        Self::open(config, HookRegistry::new())
    }

    fn open(config: Config, hooks: HookRegistry) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory {}", parent.display())
            })?;
        }

        let storage = Arc::new(DuckDbStorage::new(&config.db_path).with_context(|| {
            format!("Failed to open timetable store at {}", config.db_path.display())
        })?);
        info!(
            "{} opened at {} ({} criterion policy)",
            storage.backend_info(),
            config.db_path.display(),
            config.criterion_policy
        );

        let service = TimetableQueryService::new(storage.clone())
            .with_policy(config.criterion_policy)
            .with_hooks(hooks);

        Ok(Self {
            storage,
            service,
        })
    }

    pub fn service(&self) -> &TimetableQueryService<Arc<DuckDbStorage>> {
        &self.service
    }

    pub fn cancel_entry(&self, id: EntryId) -> Result<()> {
        self.storage
            .update_status(id, RecordStatus::Cancelled)
            .with_context(|| format!("Failed to cancel record {id}"))
    }
}
