//! Tests for the assessment history log

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use stunting_screen::models::Assessment;
use stunting_screen::{
    ClassifierLabel, FinalStatus, PredictionLog, RiskIndicators, Sex, SubjectRecord, TimeRange,
    finalize, risk_score,
};

fn timestamp(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, day)
        .unwrap()
        .and_hms_opt(hour, 30, 0)
        .unwrap()
}

fn assessment(age_months: u32, status: FinalStatus) -> Assessment {
    let indicators = RiskIndicators {
        insured: false,
        clean_water: true,
        sanitary_latrine: true,
        household_smoking: true,
        comorbidity: false,
        maternal_malnutrition: false,
    };
    Assessment {
        subject: SubjectRecord {
            sex: Sex::Female,
            age_months,
            height_cm: Some(80.0),
            indicators,
        },
        z_score: -2.0,
        label: ClassifierLabel::Normal,
        risk_score: risk_score(&indicators),
        status,
    }
}

#[test]
fn append_query_round_trip() {
    let log = PredictionLog::open_in_memory().unwrap();
    let source = assessment(24, FinalStatus::BerisikoStunting);
    let when = timestamp(10, 9);
    let id = log.append(when, &source).unwrap();

    let entries = log.query(&TimeRange::all()).unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.timestamp, when);
    assert_eq!(entry.sex, Sex::Female);
    assert_eq!(entry.age_months, 24);
    assert_eq!(entry.height_cm, 80.0);
    assert_eq!(entry.z_score, -2.0);
    assert_eq!(entry.risk_indicators, "0,1,1,1,0,0");
    assert_eq!(entry.classifier_label, ClassifierLabel::Normal);
    assert_eq!(entry.final_status, FinalStatus::BerisikoStunting);
}

#[test]
fn ids_strictly_increase() {
    let log = PredictionLog::open_in_memory().unwrap();
    let a = log
        .append(timestamp(10, 9), &assessment(24, FinalStatus::Normal))
        .unwrap();
    let b = log
        .append(timestamp(10, 10), &assessment(25, FinalStatus::Normal))
        .unwrap();
    let c = log
        .append(timestamp(10, 11), &assessment(26, FinalStatus::Normal))
        .unwrap();
    assert!(a < b && b < c);
}

#[test]
fn query_orders_by_ascending_timestamp() {
    let log = PredictionLog::open_in_memory().unwrap();
    // Inserted out of order on purpose
    log.append(timestamp(12, 9), &assessment(26, FinalStatus::Normal))
        .unwrap();
    log.append(timestamp(10, 9), &assessment(24, FinalStatus::Normal))
        .unwrap();
    log.append(timestamp(11, 9), &assessment(25, FinalStatus::Normal))
        .unwrap();

    let entries = log.query(&TimeRange::all()).unwrap();
    let ages: Vec<u32> = entries.iter().map(|e| e.age_months).collect();
    assert_eq!(ages, vec![24, 25, 26]);
}

#[test]
fn range_bounds_are_inclusive() {
    let log = PredictionLog::open_in_memory().unwrap();
    for day in 10..=14 {
        log.append(timestamp(day, 9), &assessment(24, FinalStatus::Normal))
            .unwrap();
    }

    let range = TimeRange::between(timestamp(11, 9), timestamp(13, 9));
    assert_eq!(log.query(&range).unwrap().len(), 3);

    let from = TimeRange::since(timestamp(13, 9));
    assert_eq!(log.query(&from).unwrap().len(), 2);

    let to = TimeRange::until(timestamp(10, 9));
    assert_eq!(log.query(&to).unwrap().len(), 1);
}

#[test]
fn empty_range_returns_empty_not_error() {
    let log = PredictionLog::open_in_memory().unwrap();
    log.append(timestamp(10, 9), &assessment(24, FinalStatus::Normal))
        .unwrap();

    let range = TimeRange::between(timestamp(20, 0), timestamp(21, 0));
    let entries = log.query(&range).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn delete_by_id_removes_exactly_one() {
    let log = PredictionLog::open_in_memory().unwrap();
    let first = log
        .append(timestamp(10, 9), &assessment(24, FinalStatus::Normal))
        .unwrap();
    let second = log
        .append(timestamp(11, 9), &assessment(25, FinalStatus::Normal))
        .unwrap();

    assert!(log.delete(first).unwrap());
    let entries = log.query(&TimeRange::all()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, second);

    // Deleting a nonexistent id is a no-op, not an error
    assert!(!log.delete(first).unwrap());
    assert!(!log.delete(9999).unwrap());
    assert_eq!(log.count().unwrap(), 1);
}

#[test]
fn delete_range_removes_only_matching_entries() {
    let log = PredictionLog::open_in_memory().unwrap();
    for day in 10..=14 {
        log.append(timestamp(day, 9), &assessment(24, FinalStatus::Normal))
            .unwrap();
    }

    let removed = log
        .delete_range(&TimeRange::between(timestamp(11, 0), timestamp(12, 23)))
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(log.count().unwrap(), 3);

    // A range matching nothing removes nothing
    let removed = log
        .delete_range(&TimeRange::between(timestamp(20, 0), timestamp(21, 0)))
        .unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn final_status_is_reproducible_from_stored_fields() {
    let log = PredictionLog::open_in_memory().unwrap();
    log.append(timestamp(10, 9), &assessment(24, FinalStatus::BerisikoStunting))
        .unwrap();

    let entries = log.query(&TimeRange::all()).unwrap();
    let entry = &entries[0];
    let indicators = entry.indicators().unwrap();
    let recomputed = finalize(entry.classifier_label, risk_score(&indicators));
    assert_eq!(recomputed, entry.final_status);
}

#[test]
fn file_backed_log_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let log = PredictionLog::open(&path).unwrap();
        log.append(timestamp(10, 9), &assessment(24, FinalStatus::Normal))
            .unwrap();
    }

    let reopened = PredictionLog::open(&path).unwrap();
    assert_eq!(reopened.count().unwrap(), 1);
    let entries = reopened.query(&TimeRange::all()).unwrap();
    assert_eq!(entries[0].age_months, 24);
}
