use birthday_core::model::record::parse_civil_date;
use birthday_core::{BirthdayRecord, RecordValidationError};
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn parse_normalizes_and_validates_input() {
    let record = BirthdayRecord::parse("  Ana ", " 1990-03-05 ", true, 4).unwrap();
    assert_eq!(record.name, "Ana");
    assert_eq!(record.date, NaiveDate::from_ymd_opt(1990, 3, 5).unwrap());
    assert!(record.is_lunar);
    assert_eq!(record.priority, 4);
    assert_eq!(record.date_text(), "1990-03-05");
}

#[test]
fn parse_reports_each_validation_failure() {
    assert_eq!(
        BirthdayRecord::parse("", "1990-03-05", false, 3),
        Err(RecordValidationError::EmptyName)
    );
    assert_eq!(
        BirthdayRecord::parse("Ana", "1990/03/05", false, 3),
        Err(RecordValidationError::InvalidDateFormat("1990/03/05".to_string()))
    );
    assert_eq!(
        BirthdayRecord::parse("Ana", "2001-02-29", false, 3),
        Err(RecordValidationError::NonexistentDate("2001-02-29".to_string()))
    );
    assert_eq!(
        BirthdayRecord::parse("Ana", "1990-03-05", false, 6),
        Err(RecordValidationError::PriorityOutOfRange(6))
    );
    assert_eq!(
        BirthdayRecord::parse("Ana", "1990-03-05", false, -1),
        Err(RecordValidationError::PriorityOutOfRange(-1))
    );
}

#[test]
fn leap_day_origin_is_accepted_in_leap_years() {
    assert_eq!(
        parse_civil_date("2000-02-29").unwrap(),
        NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
    );
}

#[test]
fn new_validates_typed_input() {
    let origin = NaiveDate::from_ymd_opt(1990, 3, 5).unwrap();
    assert!(BirthdayRecord::new("Ana", origin, false, 1).is_ok());
    assert_eq!(
        BirthdayRecord::new("Ana", origin, false, 0),
        Err(RecordValidationError::PriorityOutOfRange(0))
    );
}

#[test]
fn serde_shape_uses_text_dates() {
    let record = BirthdayRecord::parse("Ana", "1990-03-05", false, 5).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({ "name": "Ana", "date": "1990-03-05", "is_lunar": false, "priority": 5 })
    );

    let back: BirthdayRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn deserialize_rejects_invalid_records() {
    let bad_priority = json!({ "name": "Ana", "date": "1990-03-05", "is_lunar": false, "priority": 9 });
    assert!(serde_json::from_value::<BirthdayRecord>(bad_priority).is_err());

    let bad_date = json!({ "name": "Ana", "date": "1990-02-31", "is_lunar": false, "priority": 3 });
    assert!(serde_json::from_value::<BirthdayRecord>(bad_date).is_err());
}

#[test]
fn validate_rejects_hand_built_untrimmed_names() {
    let mut record = BirthdayRecord::parse("Ana", "1990-03-05", false, 3).unwrap();
    assert_eq!(record.validate(), Ok(()));

    record.name = " Ana".to_string();
    assert_eq!(
        record.validate(),
        Err(RecordValidationError::UntrimmedName(" Ana".to_string()))
    );
}
