//! Configuration store: the single source of truth for timer configs.

use indexmap::IndexMap;

use crate::error::TimerError;
use crate::timer::{TimerConfig, TimerDefaults, TimerId, TimerPatch};

/// CRUD contract over timer configurations.
pub trait TimerStore {
    fn get(&self, id: &TimerId) -> Option<&TimerConfig>;

    /// Create a config with the store's defaults.
    fn create(&mut self) -> TimerConfig;

    /// Apply `patch`. Returns the updated config and whether timing changed.
    fn update(&mut self, id: &TimerId, patch: &TimerPatch) -> Result<(TimerConfig, bool), TimerError>;

    fn delete(&mut self, id: &TimerId) -> Result<TimerConfig, TimerError>;

    /// All configs in creation order.
    fn list(&self) -> Vec<&TimerConfig>;
}

/// In-memory store keeping insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    defaults: TimerDefaults,
    timers: IndexMap<TimerId, TimerConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: TimerDefaults) -> Self {
        Self {
            defaults,
            timers: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl TimerStore for MemoryStore {
    fn get(&self, id: &TimerId) -> Option<&TimerConfig> {
        self.timers.get(id)
    }

    fn create(&mut self) -> TimerConfig {
        let config = TimerConfig::new(&self.defaults);
        self.timers.insert(config.id, config.clone());
        config
    }

    fn update(&mut self, id: &TimerId, patch: &TimerPatch) -> Result<(TimerConfig, bool), TimerError> {
        let config = self.timers.get_mut(id).ok_or(TimerError::NotFound(*id))?;
        let timing_changed = patch.apply_to(config);
        Ok((config.clone(), timing_changed))
    }

    fn delete(&mut self, id: &TimerId) -> Result<TimerConfig, TimerError> {
        self.timers.shift_remove(id).ok_or(TimerError::NotFound(*id))
    }

    fn list(&self) -> Vec<&TimerConfig> {
        self.timers.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{DurationUnit, InputMode, RelativeDuration};

    #[test]
    fn create_uses_store_defaults() {
        let mut store = MemoryStore::with_defaults(TimerDefaults {
            title: "pasta".into(),
            duration: RelativeDuration::new(9, DurationUnit::Minute),
        });
        let config = store.create();
        assert_eq!(config.title, "pasta");
        assert_eq!(config.input_mode, InputMode::RelativeDuration);
        assert_eq!(store.get(&config.id), Some(&config));
    }

    #[test]
    fn list_keeps_creation_order_after_delete() {
        let mut store = MemoryStore::new();
        let a = store.create().id;
        let b = store.create().id;
        let c = store.create().id;
        store.delete(&b).unwrap();
        let ids: Vec<_> = store.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut store = MemoryStore::new();
        let result = store.update(&TimerId::new(), &TimerPatch::title("x"));
        assert!(matches!(result, Err(TimerError::NotFound(_))));
    }

    #[test]
    fn update_reports_timing_change() {
        let mut store = MemoryStore::new();
        let id = store.create().id;
        let (_, changed) = store.update(&id, &TimerPatch::title("tea")).unwrap();
        assert!(!changed);
        let patch = TimerPatch::after(RelativeDuration::new(3, DurationUnit::Minute));
        let (config, changed) = store.update(&id, &patch).unwrap();
        assert!(changed);
        assert_eq!(config.title, "tea");
    }
}
