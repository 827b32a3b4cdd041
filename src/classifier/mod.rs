//! Stunting classifier
//!
//! Wraps the pretrained boosted-stump classifier and its feature scaling
//! transform. The classifier consumes a complete 10-feature vector and
//! emits a binary label; it never sees raw or partially-encoded input.
//! Callers must have applied the sentinel z-score substitution and the
//! categorical sex encoding before a vector can even be constructed.

pub mod artifact;

use std::fs::File;
use std::path::Path;

use self::artifact::{ModelArtifact, ScalerArtifact};

use crate::error::{Result, ScreeningError};
use crate::models::{ClassifierLabel, SubjectRecord};

/// Number of features the classifier was fitted on
pub const FEATURE_COUNT: usize = 10;

/// A complete, validated feature vector.
///
/// Feature order is fixed by the training data: sex code, age in months,
/// height in cm, the six risk indicators in source column order, and the
/// (sentinel-substituted) z-score. Construction fails rather than letting a
/// missing or non-finite value through, so a built vector is always safe to
/// feed to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build the feature vector for a subject and its computed z-score
    pub fn from_record(record: &SubjectRecord, z_score: f64) -> Result<Self> {
        record.validate_for_scoring()?;
        if !z_score.is_finite() {
            return Err(ScreeningError::InvalidInput(format!(
                "z-score {z_score} is not a number"
            )));
        }
        // validate_for_scoring guarantees the height is present
        let height = record.height_cm.ok_or_else(|| {
            ScreeningError::InvalidInput("height is missing".to_string())
        })?;
        let ind = &record.indicators;
        Ok(Self([
            record.sex.feature_code(),
            f64::from(record.age_months),
            height,
            f64::from(u8::from(ind.insured)),
            f64::from(u8::from(ind.clean_water)),
            f64::from(u8::from(ind.sanitary_latrine)),
            f64::from(u8::from(ind.household_smoking)),
            f64::from(u8::from(ind.comorbidity)),
            f64::from(u8::from(ind.maternal_malnutrition)),
            z_score,
        ]))
    }

    /// The raw feature values, in model order
    #[must_use]
    pub fn as_slice(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// The pretrained classifier together with its fitted scaler
#[derive(Debug, Clone)]
pub struct StuntingClassifier {
    scaler: ScalerArtifact,
    model: ModelArtifact,
}

impl StuntingClassifier {
    /// Build a classifier from already-parsed artifacts, validating both
    pub fn from_artifacts(scaler: ScalerArtifact, model: ModelArtifact) -> Result<Self> {
        scaler.validate(FEATURE_COUNT)?;
        model.validate(FEATURE_COUNT)?;
        Ok(Self { scaler, model })
    }

    /// Load the scaler and model artifacts from their JSON files
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self> {
        let scaler_file = File::open(scaler_path)?;
        let scaler = ScalerArtifact::from_reader(scaler_file, FEATURE_COUNT)?;
        let model_file = File::open(model_path)?;
        let model = ModelArtifact::from_reader(model_file, FEATURE_COUNT)?;
        log::info!(
            "Loaded classifier with {} stumps from {}",
            model.stumps.len(),
            model_path.display()
        );
        Ok(Self { scaler, model })
    }

    /// Classify a feature vector.
    ///
    /// Applies the fitted scaling transform, then takes the weighted
    /// majority vote of the stump ensemble. Ties break toward `Normal`.
    #[must_use]
    pub fn predict(&self, features: &FeatureVector) -> ClassifierLabel {
        let mut scaled = *features.as_slice();
        self.scaler.transform(&mut scaled);

        let mut votes = [0.0_f64; 2];
        for stump in &self.model.stumps {
            let class = if scaled[stump.feature] <= stump.threshold {
                stump.below
            } else {
                stump.above
            };
            votes[usize::from(class)] += stump.weight;
        }
        if votes[1] > votes[0] {
            ClassifierLabel::Stunting
        } else {
            ClassifierLabel::Normal
        }
    }

    /// Number of stumps in the loaded ensemble
    #[must_use]
    pub fn stump_count(&self) -> usize {
        self.model.stumps.len()
    }
}
