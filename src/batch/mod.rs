//! Row-wise bulk intake and tabular export
//!
//! Bulk input is a CSV of subject rows processed one at a time. Rows with
//! missing or malformed required fields are collected and reported with
//! their line number and reason, never silently dropped; the remaining
//! rows are scored normally. Export writes assessment results and history
//! entries back out as CSV.

use std::io::{Read, Write};

use itertools::Itertools;
use serde::Deserialize;

use crate::engine::ScreeningEngine;
use crate::error::{Result, ScreeningError};
use crate::models::{Assessment, FinalStatus, HistoryEntry, RiskIndicators, Sex, SubjectRecord};

/// Expected CSV header for bulk subject input
pub const SUBJECT_COLUMNS: [&str; 9] = [
    "sex",
    "age_months",
    "height_cm",
    "insured",
    "clean_water",
    "sanitary_latrine",
    "household_smoking",
    "comorbidity",
    "maternal_malnutrition",
];

/// Raw subject row, decoded before validation
#[derive(Debug, Deserialize)]
struct RawSubjectRow {
    sex: Option<String>,
    age_months: Option<u32>,
    height_cm: Option<f64>,
    insured: Option<u8>,
    clean_water: Option<u8>,
    sanitary_latrine: Option<u8>,
    household_smoking: Option<u8>,
    comorbidity: Option<u8>,
    maternal_malnutrition: Option<u8>,
}

/// A row excluded from scoring, with the reason it was excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the uploaded file (line 1 is the header)
    pub line: u64,
    /// Every problem found on the row, joined with "; "
    pub reason: String,
}

/// Result of reading a bulk upload: scorable rows plus the rejects
#[derive(Debug)]
pub struct SubjectIntake {
    /// Valid rows, each with its source line number
    pub subjects: Vec<(u64, SubjectRecord)>,
    /// Rows excluded from scoring
    pub rejected: Vec<RejectedRow>,
}

/// Decode a 0/1 indicator column, recording a problem otherwise
fn flag(name: &str, value: Option<u8>, problems: &mut Vec<String>) -> bool {
    match value {
        Some(0) => false,
        Some(1) => true,
        Some(other) => {
            problems.push(format!("{name} must be 0 or 1, got {other}"));
            false
        }
        None => {
            problems.push(format!("{name} is missing"));
            false
        }
    }
}

fn convert_row(raw: RawSubjectRow) -> std::result::Result<SubjectRecord, String> {
    let mut problems = Vec::new();

    let sex = match raw.sex.as_deref() {
        None | Some("") => {
            problems.push("sex is missing".to_string());
            None
        }
        Some(code) => {
            let parsed = Sex::parse(code);
            if parsed.is_none() {
                problems.push(format!("unrecognized sex code: {code:?}"));
            }
            parsed
        }
    };

    if raw.age_months.is_none() {
        problems.push("age_months is missing".to_string());
    }

    let indicators = RiskIndicators {
        insured: flag("insured", raw.insured, &mut problems),
        clean_water: flag("clean_water", raw.clean_water, &mut problems),
        sanitary_latrine: flag("sanitary_latrine", raw.sanitary_latrine, &mut problems),
        household_smoking: flag("household_smoking", raw.household_smoking, &mut problems),
        comorbidity: flag("comorbidity", raw.comorbidity, &mut problems),
        maternal_malnutrition: flag(
            "maternal_malnutrition",
            raw.maternal_malnutrition,
            &mut problems,
        ),
    };

    if !problems.is_empty() {
        return Err(problems.join("; "));
    }

    // Both are guaranteed present once problems is empty
    let record = SubjectRecord {
        sex: sex.ok_or("sex is missing")?,
        age_months: raw.age_months.ok_or("age_months is missing")?,
        height_cm: raw.height_cm,
        indicators,
    };
    record.validate_for_scoring().map_err(|e| match e {
        ScreeningError::InvalidInput(message) => message,
        other => other.to_string(),
    })?;
    Ok(record)
}

/// Read a bulk subject upload, separating scorable rows from rejects.
///
/// A row that fails CSV decoding (for example a non-numeric age) is
/// rejected with the decoder's message rather than failing the batch.
pub fn read_subject_rows<R: Read>(reader: R) -> Result<SubjectIntake> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut subjects = Vec::new();
    let mut rejected = Vec::new();

    for (index, result) in csv_reader.deserialize::<RawSubjectRow>().enumerate() {
        // Header is line 1, so the first data row is line 2
        let line = (index + 2) as u64;
        match result {
            Ok(raw) => match convert_row(raw) {
                Ok(record) => subjects.push((line, record)),
                Err(reason) => rejected.push(RejectedRow { line, reason }),
            },
            Err(e) => rejected.push(RejectedRow {
                line,
                reason: e.to_string(),
            }),
        }
    }

    if !rejected.is_empty() {
        log::warn!(
            "{} of {} uploaded rows excluded from scoring",
            rejected.len(),
            subjects.len() + rejected.len()
        );
    }
    Ok(SubjectIntake { subjects, rejected })
}

/// Completed batch run: the scored assessments plus every excluded row
#[derive(Debug)]
pub struct BatchReport {
    /// Assessments for the rows that scored
    pub assessments: Vec<Assessment>,
    /// Rows excluded from scoring, in file order
    pub rejected: Vec<RejectedRow>,
}

impl BatchReport {
    /// Distribution of final statuses across the scored rows
    #[must_use]
    pub fn status_counts(&self) -> Vec<(FinalStatus, usize)> {
        self.assessments
            .iter()
            .map(|a| a.status)
            .counts()
            .into_iter()
            .sorted_by_key(|(status, _)| *status)
            .collect()
    }
}

/// Score a bulk upload row by row.
///
/// Rows the engine itself refuses (invalid input) join the rejects; any
/// other engine failure is fatal to the batch. With `record` set, each
/// scored row is appended to the engine's history log.
pub fn run_batch<R: Read>(
    engine: &ScreeningEngine,
    reader: R,
    record: bool,
) -> Result<BatchReport> {
    let intake = read_subject_rows(reader)?;
    let mut assessments = Vec::with_capacity(intake.subjects.len());
    let mut rejected = intake.rejected;

    for (line, subject) in intake.subjects {
        let result = if record {
            engine.assess_and_record(&subject).map(|(_, a)| a)
        } else {
            engine.assess(&subject)
        };
        match result {
            Ok(assessment) => assessments.push(assessment),
            Err(ScreeningError::InvalidInput(reason)) => {
                rejected.push(RejectedRow { line, reason });
            }
            Err(other) => return Err(other),
        }
    }

    // Intake rejects and engine rejects back in file order
    rejected.sort_by_key(|r| r.line);
    log::info!(
        "Scored {} rows, {} rejected",
        assessments.len(),
        rejected.len()
    );
    Ok(BatchReport {
        assessments,
        rejected,
    })
}

/// Write assessment results as CSV
pub fn write_assessments_csv<W: Write>(assessments: &[Assessment], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = SUBJECT_COLUMNS.to_vec();
    header.extend(["z_score", "classifier_label", "final_status"]);
    csv_writer.write_record(&header)?;

    for assessment in assessments {
        let subject = &assessment.subject;
        let ind = &subject.indicators;
        let height = subject
            .height_cm
            .map_or_else(String::new, |h| h.to_string());
        csv_writer.write_record([
            subject.sex.to_string(),
            subject.age_months.to_string(),
            height,
            u8::from(ind.insured).to_string(),
            u8::from(ind.clean_water).to_string(),
            u8::from(ind.sanitary_latrine).to_string(),
            u8::from(ind.household_smoking).to_string(),
            u8::from(ind.comorbidity).to_string(),
            u8::from(ind.maternal_malnutrition).to_string(),
            assessment.z_score.to_string(),
            assessment.label.to_string(),
            assessment.status.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write history entries as CSV
pub fn write_history_csv<W: Write>(entries: &[HistoryEntry], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "id",
        "timestamp",
        "sex",
        "age_months",
        "height_cm",
        "z_score",
        "risk_indicators",
        "classifier_label",
        "final_status",
    ])?;

    for entry in entries {
        csv_writer.write_record([
            entry.id.to_string(),
            entry
                .timestamp
                .format(crate::history::TIMESTAMP_FORMAT)
                .to_string(),
            entry.sex.to_string(),
            entry.age_months.to_string(),
            entry.height_cm.to_string(),
            entry.z_score.to_string(),
            entry.risk_indicators.clone(),
            entry.classifier_label.to_string(),
            entry.final_status.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
