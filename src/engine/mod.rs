//! Screening engine composition root
//!
//! Wires the immutable reference table, the pretrained classifier and the
//! history log into the full assessment pipeline: z-score (with sentinel
//! substitution), feature vector, classifier label, risk overlay, final
//! status. Everything is loaded once at startup and read-only afterwards;
//! the engine's scoring path is pure given its construction-time state.

use chrono::{Local, NaiveDateTime};

use crate::algorithm::risk::{finalize, risk_score};
use crate::algorithm::zscore::zscore_or_sentinel;
use crate::classifier::{FeatureVector, StuntingClassifier};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::PredictionLog;
use crate::models::{Assessment, SubjectRecord};
use crate::reference::GrowthReferenceTable;

/// The assembled screening engine
#[derive(Debug)]
pub struct ScreeningEngine {
    reference: GrowthReferenceTable,
    classifier: StuntingClassifier,
    log: PredictionLog,
}

impl ScreeningEngine {
    /// Load every component named by `config` and assemble the engine
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let reference = GrowthReferenceTable::from_csv_path(&config.reference_path)?;
        let classifier = StuntingClassifier::load(&config.scaler_path, &config.model_path)?;
        let log = PredictionLog::open(&config.history_path)?;
        Ok(Self::new(reference, classifier, log))
    }

    /// Assemble an engine from already-built components
    #[must_use]
    pub fn new(
        reference: GrowthReferenceTable,
        classifier: StuntingClassifier,
        log: PredictionLog,
    ) -> Self {
        Self {
            reference,
            classifier,
            log,
        }
    }

    /// The loaded growth reference table
    #[must_use]
    pub fn reference(&self) -> &GrowthReferenceTable {
        &self.reference
    }

    /// The assessment history log
    #[must_use]
    pub fn log(&self) -> &PredictionLog {
        &self.log
    }

    /// Run one subject through the full pipeline without persisting
    pub fn assess(&self, subject: &SubjectRecord) -> Result<Assessment> {
        subject.validate_for_scoring()?;
        let z_score = zscore_or_sentinel(
            subject.sex,
            subject.age_months,
            subject.height_cm,
            &self.reference,
        )?;
        let features = FeatureVector::from_record(subject, z_score)?;
        let label = self.classifier.predict(&features);
        let risk = risk_score(&subject.indicators);
        let status = finalize(label, risk);
        Ok(Assessment {
            subject: subject.clone(),
            z_score,
            label,
            risk_score: risk,
            status,
        })
    }

    /// Assess and append to the history log, stamped with the current
    /// local time. Returns the assigned history id with the assessment.
    pub fn assess_and_record(&self, subject: &SubjectRecord) -> Result<(i64, Assessment)> {
        self.assess_and_record_at(subject, Local::now().naive_local())
    }

    /// Assess and append to the history log with a caller-supplied timestamp
    pub fn assess_and_record_at(
        &self,
        subject: &SubjectRecord,
        timestamp: NaiveDateTime,
    ) -> Result<(i64, Assessment)> {
        let assessment = self.assess(subject)?;
        let id = self.log.append(timestamp, &assessment)?;
        Ok((id, assessment))
    }
}
