use birthday_core::config::{parse_notify_time, CONFIG_FILE_NAME};
use birthday_core::{AppConfig, ConfigError, Language, TriggerRuleSet};
use chrono::NaiveTime;
use std::time::Duration;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load(dir.path().join(CONFIG_FILE_NAME)).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.notify_time, time(9, 0));
    assert_eq!(config.language, Language::Zh);
    assert_eq!(config.rules, TriggerRuleSet::new());
    assert_eq!(config.poll_interval, Duration::from_secs(30));
}

#[test]
fn parses_full_document() {
    let config = AppConfig::from_json_str(
        r#"{
            "language": "en",
            "notify_time": "07:45",
            "remind_rules": { "5": [0, 1, 3, 7], "3": [0, 1] },
            "poll_interval_secs": 60
        }"#,
    )
    .unwrap();

    assert_eq!(config.language, Language::En);
    assert_eq!(config.notify_time, time(7, 45));
    assert_eq!(config.poll_interval, Duration::from_secs(60));
    assert_eq!(config.rules.offsets(5), vec![0, 1, 3, 7]);
    assert_eq!(config.rules.offsets(3), vec![0, 1]);
    assert_eq!(config.rules.offsets(1), vec![0]);
    assert_eq!(config.rules.max_offset(), 7);
}

#[test]
fn partial_document_keeps_other_defaults() {
    let config = AppConfig::from_json_str(r#"{ "remind_rules": { "4": [2] } }"#).unwrap();

    assert_eq!(config.notify_time, time(9, 0));
    assert_eq!(config.language, Language::Zh);
    assert!(config.rules.contains(4, 2));
    assert!(!config.rules.contains(4, 0));
}

#[test]
fn notify_time_accepts_seconds_and_rejects_garbage() {
    assert_eq!(
        parse_notify_time("21:30:15").unwrap(),
        NaiveTime::from_hms_opt(21, 30, 15).unwrap()
    );
    for bad in ["9:00", "25:00", "09:60", "nine"] {
        assert!(
            matches!(parse_notify_time(bad), Err(ConfigError::InvalidNotifyTime(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn invalid_fields_are_reported() {
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "remind_rules": { "six": [0] } }"#),
        Err(ConfigError::InvalidPriorityKey(key)) if key == "six"
    ));
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "remind_rules": { "9": [0] } }"#),
        Err(ConfigError::InvalidPriorityKey(_))
    ));
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "language": "fr" }"#),
        Err(ConfigError::InvalidLanguage(_))
    ));
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "poll_interval_secs": 0 }"#),
        Err(ConfigError::InvalidPollInterval(0))
    ));
    assert!(matches!(
        AppConfig::from_json_str(r#"{ "remind_rules": { "3": [-1] } }"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        AppConfig::from_json_str("not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn load_or_default_falls_back_on_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, r#"{ "notify_time": "late" }"#).unwrap();

    assert!(AppConfig::load(&path).is_err());
    assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let config = AppConfig {
        notify_time: time(8, 15),
        rules: TriggerRuleSet::new().with_rule(5, [0, 1, 3, 7]),
        language: Language::En,
        poll_interval: Duration::from_secs(10),
    };

    config.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"remind_rules\""));
    assert!(text.contains("\"08:15\""));

    assert_eq!(AppConfig::load(&path).unwrap(), config);
}
