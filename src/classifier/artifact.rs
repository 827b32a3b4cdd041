//! Model and scaler artifacts
//!
//! The classifier and its feature scaler are pretrained offline and shipped
//! as versioned JSON artifacts. They are loaded once at process start,
//! validated eagerly, and never retrained or mutated. The model artifact is
//! a boosted decision-stump ensemble as fitted by the offline training
//! script; the scaler artifact carries the per-feature mean and scale of
//! the fitted standard scaler.

use std::io::Read;

use serde::{Deserialize, Serialize};

/// Artifact format version this build understands
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while loading or validating an artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact written by an incompatible tool version
    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    /// Artifact content fails validation
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Alias for Result with `ArtifactError`
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Per-feature affine scaling transform, as fitted offline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Artifact format version
    pub format_version: u32,
    /// Per-feature mean subtracted before scaling
    pub mean: Vec<f64>,
    /// Per-feature scale divided by after centering
    pub scale: Vec<f64>,
}

impl ScalerArtifact {
    /// Read and validate a scaler artifact from JSON
    pub fn from_reader<R: Read>(reader: R, n_features: usize) -> Result<Self> {
        let artifact: Self = serde_json::from_reader(reader)?;
        artifact.validate(n_features)?;
        Ok(artifact)
    }

    /// Validate the artifact against the expected feature count
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(self.format_version));
        }
        if self.mean.len() != n_features || self.scale.len() != n_features {
            return Err(ArtifactError::Invalid(format!(
                "scaler has {} means and {} scales, expected {n_features} of each",
                self.mean.len(),
                self.scale.len()
            )));
        }
        for (index, scale) in self.scale.iter().enumerate() {
            if !scale.is_finite() || *scale == 0.0 {
                return Err(ArtifactError::Invalid(format!(
                    "scaler has unusable scale {scale} for feature {index}"
                )));
            }
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ArtifactError::Invalid(
                "scaler has a non-finite mean".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the transform in place
    pub fn transform(&self, features: &mut [f64]) {
        for (index, value) in features.iter_mut().enumerate() {
            *value = (*value - self.mean[index]) / self.scale[index];
        }
    }
}

/// One weighted decision stump of the boosted ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionStump {
    /// Index of the feature the stump splits on
    pub feature: usize,
    /// Split threshold on the scaled feature value
    pub threshold: f64,
    /// Class voted for when the feature is at or below the threshold
    pub below: u8,
    /// Class voted for when the feature is above the threshold
    pub above: u8,
    /// Stage weight of this stump's vote
    pub weight: f64,
}

/// Boosted decision-stump ensemble, as fitted offline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact format version
    pub format_version: u32,
    /// Feature count the ensemble was fitted on
    pub n_features: usize,
    /// The weighted stumps, in boosting order
    pub stumps: Vec<DecisionStump>,
}

impl ModelArtifact {
    /// Read and validate a model artifact from JSON
    pub fn from_reader<R: Read>(reader: R, n_features: usize) -> Result<Self> {
        let artifact: Self = serde_json::from_reader(reader)?;
        artifact.validate(n_features)?;
        Ok(artifact)
    }

    /// Validate the artifact against the expected feature count
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(self.format_version));
        }
        if self.n_features != n_features {
            return Err(ArtifactError::Invalid(format!(
                "model was fitted on {} features, expected {n_features}",
                self.n_features
            )));
        }
        if self.stumps.is_empty() {
            return Err(ArtifactError::Invalid("model has no stumps".to_string()));
        }
        for (index, stump) in self.stumps.iter().enumerate() {
            if stump.feature >= self.n_features {
                return Err(ArtifactError::Invalid(format!(
                    "stump {index} splits on feature {} of {}",
                    stump.feature, self.n_features
                )));
            }
            if !stump.threshold.is_finite() {
                return Err(ArtifactError::Invalid(format!(
                    "stump {index} has a non-finite threshold"
                )));
            }
            if stump.below > 1 || stump.above > 1 {
                return Err(ArtifactError::Invalid(format!(
                    "stump {index} votes for a class outside {{0, 1}}"
                )));
            }
            if !stump.weight.is_finite() || stump.weight < 0.0 {
                return Err(ArtifactError::Invalid(format!(
                    "stump {index} has an unusable weight {}",
                    stump.weight
                )));
            }
        }
        Ok(())
    }
}
