use birthday_core::{should_notify, TriggerRuleSet};

#[test]
fn fires_only_on_configured_offsets() {
    let rules = TriggerRuleSet::new().with_rule(5, [0, 1, 3, 7]);

    for days_left in [0, 1, 3, 7] {
        assert!(should_notify(days_left, 5, &rules), "offset {days_left}");
    }
    for days_left in [2, 4, 5, 6, 8, 30, 365] {
        assert!(!should_notify(days_left, 5, &rules), "offset {days_left}");
    }
}

#[test]
fn missing_priority_falls_back_to_day_of() {
    let rules = TriggerRuleSet::new().with_rule(3, [0, 1]);

    assert!(!rules.has_rule(5));
    assert!(should_notify(0, 5, &rules));
    assert!(!should_notify(1, 5, &rules));
    assert_eq!(rules.offsets(5), vec![0]);
}

#[test]
fn explicit_rule_without_zero_skips_the_day_itself() {
    let rules = TriggerRuleSet::new().with_rule(2, [7]);
    assert!(!should_notify(0, 2, &rules));
    assert!(should_notify(7, 2, &rules));
}

#[test]
fn empty_rule_set_uses_default_everywhere() {
    let rules = TriggerRuleSet::default();
    for priority in 1..=5 {
        assert!(should_notify(0, priority, &rules));
        assert!(!should_notify(1, priority, &rules));
    }
    assert_eq!(rules.max_offset(), 0);
}

#[test]
fn decision_is_pure() {
    let rules = TriggerRuleSet::new().with_rule(4, [0, 2]);
    let first: Vec<bool> = (0..10).map(|days| should_notify(days, 4, &rules)).collect();
    let second: Vec<bool> = (0..10).map(|days| should_notify(days, 4, &rules)).collect();
    assert_eq!(first, second);
}

#[test]
fn max_offset_covers_all_priorities() {
    let rules = TriggerRuleSet::new()
        .with_rule(1, [0])
        .with_rule(5, [0, 1, 3, 7])
        .with_rule(3, [14]);
    assert_eq!(rules.max_offset(), 14);
    assert_eq!(rules.offsets(5), vec![0, 1, 3, 7]);
}
