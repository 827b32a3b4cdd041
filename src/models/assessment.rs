//! Completed assessment model
//!
//! An `Assessment` is the in-memory result of running one subject through
//! the full pipeline: z-score, classifier, risk overlay. It is what batch
//! export writes and what the engine persists to the history log.

use std::fmt;

use super::subject::SubjectRecord;
use super::types::{ClassifierLabel, FinalStatus};

/// The completed result of one assessment
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// The subject as submitted
    pub subject: SubjectRecord,
    /// The height-for-age z-score fed to the classifier, after any
    /// sentinel substitution
    pub z_score: f64,
    /// Raw label emitted by the classifier
    pub label: ClassifierLabel,
    /// Count of adverse risk indicators (0 to 6)
    pub risk_score: u8,
    /// Final status after the risk overlay
    pub status: FinalStatus,
}

impl Assessment {
    /// Operator-facing explanation tier for this result
    #[must_use]
    pub fn explanation(&self) -> StatusExplanation {
        match self.status {
            FinalStatus::Normal if self.risk_score == 0 => StatusExplanation::NormalNoRisk,
            FinalStatus::Normal => StatusExplanation::NormalWithRisk(self.risk_score),
            FinalStatus::BerisikoStunting => StatusExplanation::AtRisk(self.risk_score),
            FinalStatus::StuntingRisikoTinggi => StatusExplanation::HighRisk,
            FinalStatus::Stunting => StatusExplanation::Stunted,
        }
    }
}

/// Explanation tier shown to the operator alongside a final status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusExplanation {
    /// Normal growth and no adverse indicators
    NormalNoRisk,
    /// Normal growth but some adverse indicators present
    NormalWithRisk(u8),
    /// Normal label overridden to at-risk; intervention recommended
    AtRisk(u8),
    /// Stunted with a high additional risk burden; urgent care needed
    HighRisk,
    /// Stunted growth by height-for-age
    Stunted,
}

impl fmt::Display for StatusExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NormalNoRisk => {
                write!(f, "Normal growth with no additional risk factors.")
            }
            Self::NormalWithRisk(n) => {
                write!(f, "Normal growth with {n} additional risk factor(s).")
            }
            Self::AtRisk(n) => write!(
                f,
                "Normal growth but at risk ({n} risk factor(s)); intervention recommended."
            ),
            Self::HighRisk => write!(
                f,
                "Stunted with a high additional risk burden; urgent follow-up needed."
            ),
            Self::Stunted => write!(f, "Stunted growth by height-for-age."),
        }
    }
}
