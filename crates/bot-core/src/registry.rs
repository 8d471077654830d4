//! The process's only long-lived mutable state: bot id → bound strategy.

use std::collections::{BTreeMap, BTreeSet};

use crate::strategy::Strategy;

/// Owns every live strategy instance, keyed by engine bot id.
///
/// Invariants: an id the engine reports alive for this process has exactly one
/// entry, and an id is never rebound while its entry exists. [`retain_alive`]
/// is the sole deletion path, so an instance's resources are released exactly
/// once.
///
/// [`retain_alive`]: LifecycleRegistry::retain_alive
#[derive(Debug, Default)]
pub struct LifecycleRegistry {
    entries: BTreeMap<u64, Box<dyn Strategy>>,
}

impl LifecycleRegistry {
    pub fn new() -> LifecycleRegistry {
        LifecycleRegistry::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, bot_id: u64) -> bool {
        self.entries.contains_key(&bot_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    /// Binds a freshly built strategy to a freshly allocated id. Monotonic id
    /// allocation makes a collision unreachable; treat one as a bug.
    pub fn register(&mut self, bot_id: u64, strategy: Box<dyn Strategy>) {
        let prior = self.entries.insert(bot_id, strategy);
        debug_assert!(prior.is_none(), "bot id {bot_id} was still bound");
    }

    pub fn get_mut(&mut self, bot_id: u64) -> Option<&mut (dyn Strategy + 'static)> {
        self.entries.get_mut(&bot_id).map(|s| s.as_mut())
    }

    /// Drops every entry whose id is not in `survivors`, returning the retired
    /// ids in ascending order.
    pub fn retain_alive(&mut self, survivors: &BTreeSet<u64>) -> Vec<u64> {
        let retired: Vec<u64> = self
            .entries
            .keys()
            .copied()
            .filter(|id| !survivors.contains(id))
            .collect();
        for id in &retired {
            self.entries.remove(id);
        }
        retired
    }
}
