use crate::domain::CriterionPolicy;
use anyhow::{Result, anyhow};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub criterion_policy: CriterionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("TIMETABLE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("doctor-timetable")
            });

        let db_path = lookup("TIMETABLE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("timetable.db"));

        let criterion_policy = match lookup("TIMETABLE_CRITERION_POLICY") {
            Some(value) => value
                .parse::<CriterionPolicy>()
                .map_err(|e| anyhow!("TIMETABLE_CRITERION_POLICY: {e}"))?,
            None => CriterionPolicy::default(),
        };

        Ok(Self {
            data_dir,
            db_path,
            criterion_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn db_defaults_inside_data_dir() {
        let config = Config::from_lookup(lookup_from(&[("TIMETABLE_DIR", "/srv/clinic")])).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/clinic"));
        assert_eq!(config.db_path, PathBuf::from("/srv/clinic/timetable.db"));
        assert_eq!(config.criterion_policy, CriterionPolicy::Legacy);
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup_from(&[
            ("TIMETABLE_DIR", "/srv/clinic"),
            ("TIMETABLE_DB", "/tmp/other.db"),
            ("TIMETABLE_CRITERION_POLICY", "bounded"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.criterion_policy, CriterionPolicy::Bounded);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("TIMETABLE_CRITERION_POLICY", "loose")]))
            .unwrap_err();
        assert!(err.to_string().contains("TIMETABLE_CRITERION_POLICY"));
    }
}
