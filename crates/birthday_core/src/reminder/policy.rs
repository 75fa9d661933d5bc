//! Trigger policy: does a record fire today?

use crate::model::rules::TriggerRuleSet;

/// Returns `true` iff `days_left` is one of the offsets configured for
/// `priority`, or `days_left == 0` when `priority` has no entry.
pub fn should_notify(days_left: u32, priority: u8, rules: &TriggerRuleSet) -> bool {
    rules.contains(priority, days_left)
}
