//! Common domain type definitions
//!
//! This module contains the enum types shared across the crate. All encoding
//! decisions (dataset sex codes, model class indices, persisted status
//! strings) live here so the rest of the code only ever sees typed values.

use std::fmt;
use std::str::FromStr;

use crate::error::ScreeningError;

/// Sex of a child, as used by the WHO growth reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Parse a dataset sex code.
    ///
    /// Accepts the source dataset codes ("L"/"P"), English codes
    /// ("M"/"F", "male"/"female") and the 1/0 integer encoding.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "l" | "m" | "male" | "laki-laki" | "1" => Some(Self::Male),
            "p" | "f" | "female" | "perempuan" | "0" => Some(Self::Female),
            _ => None,
        }
    }

    /// Integer encoding used in the model feature vector (male = 1, female = 0)
    #[must_use]
    pub fn feature_code(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Persisted using the source dataset codes
        match self {
            Self::Male => write!(f, "L"),
            Self::Female => write!(f, "P"),
        }
    }
}

impl FromStr for Sex {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            ScreeningError::InvalidInput(format!("unrecognized sex code: {s:?}"))
        })
    }
}

/// Label emitted by the pretrained classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierLabel {
    /// Height within the expected range for sex and age
    Normal,
    /// Stunted growth
    Stunting,
}

impl ClassifierLabel {
    /// Class index used by the model artifact (Normal = 0, Stunting = 1)
    #[must_use]
    pub fn class_index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Stunting => 1,
        }
    }
}

impl From<i32> for ClassifierLabel {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Stunting,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for ClassifierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Stunting => write!(f, "Stunting"),
        }
    }
}

impl FromStr for ClassifierLabel {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "0" => Ok(Self::Normal),
            "stunting" | "1" => Ok(Self::Stunting),
            _ => Err(ScreeningError::InvalidInput(format!(
                "unrecognized classifier label: {s:?}"
            ))),
        }
    }
}

/// Final status after the risk overlay has been applied to the classifier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FinalStatus {
    /// Normal growth, no overlay adjustment
    Normal,
    /// Classifier said normal, but enough risk factors to flag for intervention
    BerisikoStunting,
    /// Classifier said stunting, with a high additional risk burden
    StuntingRisikoTinggi,
    /// Stunted growth, no overlay adjustment
    Stunting,
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The operator-facing strings persisted by the original tool
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::BerisikoStunting => write!(f, "Berisiko Stunting"),
            Self::StuntingRisikoTinggi => write!(f, "Stunting Risiko Tinggi"),
            Self::Stunting => write!(f, "Stunting"),
        }
    }
}

impl FromStr for FinalStatus {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "berisiko stunting" => Ok(Self::BerisikoStunting),
            "stunting risiko tinggi" => Ok(Self::StuntingRisikoTinggi),
            "stunting" => Ok(Self::Stunting),
            _ => Err(ScreeningError::InvalidInput(format!(
                "unrecognized final status: {s:?}"
            ))),
        }
    }
}
