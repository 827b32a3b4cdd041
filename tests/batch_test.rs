//! Tests for bulk intake, batch scoring and CSV export

use stunting_screen::batch::{self, read_subject_rows};
use stunting_screen::classifier::artifact::{
    ARTIFACT_FORMAT_VERSION, DecisionStump, ModelArtifact, ScalerArtifact,
};
use stunting_screen::reference::{GrowthReferenceTable, ReferenceRow};
use stunting_screen::{
    FEATURE_COUNT, FinalStatus, PredictionLog, ScreeningEngine, Sex, StuntingClassifier, TimeRange,
};

/// Engine with one reference bracket and a classifier that flags any
/// z-score at or below -2.0 as stunting
fn test_engine() -> ScreeningEngine {
    let reference = GrowthReferenceTable::from_rows([
        ReferenceRow {
            sex: Sex::Female,
            age_months: 24,
            median_cm: 85.0,
            sd_cm: 2.5,
        },
        ReferenceRow {
            sex: Sex::Male,
            age_months: 24,
            median_cm: 87.1,
            sd_cm: 2.8,
        },
    ])
    .unwrap();
    let scaler = ScalerArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1.0; FEATURE_COUNT],
    };
    let model = ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        n_features: FEATURE_COUNT,
        stumps: vec![DecisionStump {
            feature: 9,
            threshold: -2.0,
            below: 1,
            above: 0,
            weight: 1.0,
        }],
    };
    let classifier = StuntingClassifier::from_artifacts(scaler, model).unwrap();
    let log = PredictionLog::open_in_memory().unwrap();
    ScreeningEngine::new(reference, classifier, log)
}

const HEADER: &str =
    "sex,age_months,height_cm,insured,clean_water,sanitary_latrine,household_smoking,comorbidity,maternal_malnutrition\n";

#[test]
fn intake_separates_valid_and_invalid_rows() {
    let csv = format!(
        "{HEADER}P,24,80.0,1,1,1,0,0,0\n\
         P,24,,1,1,1,0,0,0\n\
         L,24,90.0,1,1,1,2,0,0\n\
         X,24,85.0,1,1,1,0,0,0\n\
         L,24,88.0,0,0,1,1,0,0\n"
    );
    let intake = read_subject_rows(csv.as_bytes()).unwrap();

    assert_eq!(intake.subjects.len(), 2);
    assert_eq!(intake.rejected.len(), 3);

    // Line numbers are file lines, header included
    assert_eq!(intake.rejected[0].line, 3);
    assert!(intake.rejected[0].reason.contains("height is missing"));
    assert_eq!(intake.rejected[1].line, 4);
    assert!(intake.rejected[1].reason.contains("household_smoking"));
    assert_eq!(intake.rejected[2].line, 5);
    assert!(intake.rejected[2].reason.contains("sex"));
}

#[test]
fn intake_reports_every_problem_on_a_row() {
    let csv = format!("{HEADER},24,,1,1,1,0,0,\n");
    let intake = read_subject_rows(csv.as_bytes()).unwrap();
    assert_eq!(intake.subjects.len(), 0);
    let reason = &intake.rejected[0].reason;
    assert!(reason.contains("sex is missing"));
    assert!(reason.contains("maternal_malnutrition is missing"));
}

#[test]
fn intake_survives_undecodable_rows() {
    // A non-numeric age fails CSV decoding; the batch keeps going
    let csv = format!("{HEADER}P,twenty,80.0,1,1,1,0,0,0\nP,24,80.0,1,1,1,0,0,0\n");
    let intake = read_subject_rows(csv.as_bytes()).unwrap();
    assert_eq!(intake.subjects.len(), 1);
    assert_eq!(intake.rejected.len(), 1);
    assert_eq!(intake.rejected[0].line, 2);
}

#[test]
fn batch_scores_valid_rows_and_reports_rejects() {
    let engine = test_engine();
    // Row 2: z = (80 - 85) / 2.5 = -2.0, no risk -> Stunting
    // Row 3: z = (87.1 - 87.1) / 2.8 = 0, risk 2 -> Berisiko Stunting
    // Row 4: missing height -> rejected
    let csv = format!(
        "{HEADER}P,24,80.0,1,1,1,0,0,0\n\
         L,24,87.1,0,1,1,1,0,0\n\
         P,24,,1,1,1,0,0,0\n"
    );
    let report = batch::run_batch(&engine, csv.as_bytes(), false).unwrap();

    assert_eq!(report.assessments.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.assessments[0].status, FinalStatus::Stunting);
    assert_eq!(report.assessments[1].status, FinalStatus::BerisikoStunting);

    let counts = report.status_counts();
    assert_eq!(
        counts,
        vec![(FinalStatus::BerisikoStunting, 1), (FinalStatus::Stunting, 1)]
    );

    // record was false, so nothing was persisted
    assert_eq!(engine.log().count().unwrap(), 0);
}

#[test]
fn batch_with_record_appends_to_history() {
    let engine = test_engine();
    let csv = format!("{HEADER}P,24,80.0,1,1,1,0,0,0\nL,24,90.0,1,1,1,0,0,0\n");
    let report = batch::run_batch(&engine, csv.as_bytes(), true).unwrap();

    assert_eq!(report.assessments.len(), 2);
    let entries = engine.log().query(&TimeRange::all()).unwrap();
    assert_eq!(entries.len(), 2);
}

#[test]
fn assessments_export_as_csv() {
    let engine = test_engine();
    let csv = format!("{HEADER}P,24,80.0,1,1,1,0,0,0\n");
    let report = batch::run_batch(&engine, csv.as_bytes(), false).unwrap();

    let mut out = Vec::new();
    batch::write_assessments_csv(&report.assessments, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();

    let header = lines.next().unwrap();
    assert!(header.starts_with("sex,age_months,height_cm"));
    assert!(header.ends_with("z_score,classifier_label,final_status"));

    let row = lines.next().unwrap();
    assert_eq!(row, "P,24,80,1,1,1,0,0,0,-2,Stunting,Stunting");
    assert_eq!(lines.next(), None);
}

#[test]
fn history_exports_as_csv() {
    let engine = test_engine();
    let csv = format!("{HEADER}P,24,80.0,1,1,1,0,0,0\n");
    batch::run_batch(&engine, csv.as_bytes(), true).unwrap();

    let entries = engine.log().query(&TimeRange::all()).unwrap();
    let mut out = Vec::new();
    batch::write_history_csv(&entries, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,timestamp,sex,age_months,height_cm,z_score,risk_indicators,classifier_label,final_status"
    );
    let row = lines.next().unwrap();
    assert!(row.contains(",P,24,80,-2,"));
    assert!(row.contains("\"1,1,1,0,0,0\""));
    assert!(row.ends_with("Stunting"));
}
