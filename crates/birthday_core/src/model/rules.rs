//! Trigger rule set: which day-offsets fire a reminder for each priority.

use std::collections::{BTreeMap, BTreeSet};

/// Offsets used for a priority with no configured entry: the day itself.
pub const DEFAULT_TRIGGER_OFFSETS: &[u32] = &[0];

/// Mapping from priority level to the days-before-birthday offsets that fire.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerRuleSet {
    rules: BTreeMap<u8, BTreeSet<u32>>,
}

impl TriggerRuleSet {
    /// Creates an empty rule set (every priority falls back to `{0}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that sets the offsets for one priority.
    pub fn with_rule(mut self, priority: u8, offsets: impl IntoIterator<Item = u32>) -> Self {
        self.set_rule(priority, offsets);
        self
    }

    /// Replaces the offsets for one priority.
    pub fn set_rule(&mut self, priority: u8, offsets: impl IntoIterator<Item = u32>) {
        self.rules.insert(priority, offsets.into_iter().collect());
    }

    /// Returns whether `priority` has an explicit entry.
    pub fn has_rule(&self, priority: u8) -> bool {
        self.rules.contains_key(&priority)
    }

    /// Returns whether `days_left` is one of the effective offsets for `priority`.
    pub fn contains(&self, priority: u8, days_left: u32) -> bool {
        match self.rules.get(&priority) {
            Some(offsets) => offsets.contains(&days_left),
            None => DEFAULT_TRIGGER_OFFSETS.contains(&days_left),
        }
    }

    /// Effective offsets for `priority`, ascending.
    pub fn offsets(&self, priority: u8) -> Vec<u32> {
        match self.rules.get(&priority) {
            Some(offsets) => offsets.iter().copied().collect(),
            None => DEFAULT_TRIGGER_OFFSETS.to_vec(),
        }
    }

    /// Largest offset any priority can fire at.
    pub fn max_offset(&self) -> u32 {
        self.rules
            .values()
            .filter_map(|offsets| offsets.iter().next_back().copied())
            .chain(DEFAULT_TRIGGER_OFFSETS.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Iterates configured `(priority, offsets)` entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BTreeSet<u32>)> {
        self.rules.iter().map(|(priority, offsets)| (*priority, offsets))
    }
}
