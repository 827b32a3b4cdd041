//! Persisted history entry model

use chrono::NaiveDateTime;

use super::subject::RiskIndicators;
use super::types::{ClassifierLabel, FinalStatus, Sex};

/// One persisted assessment, exactly as stored in the history log.
///
/// The final status of an entry is always reproducible from its own stored
/// fields: decode the indicator flag string, recompute the risk score, and
/// apply the overlay decision table to the stored classifier label.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Auto-assigned identifier, strictly increasing across appends
    pub id: i64,
    /// When the assessment was recorded (second precision)
    pub timestamp: NaiveDateTime,
    /// Sex of the child
    pub sex: Sex,
    /// Age in completed months
    pub age_months: u32,
    /// Measured height in centimeters
    pub height_cm: f64,
    /// Height-for-age z-score fed to the classifier
    pub z_score: f64,
    /// Risk indicators as the persisted flag string
    pub risk_indicators: String,
    /// Raw classifier label
    pub classifier_label: ClassifierLabel,
    /// Final status after the risk overlay
    pub final_status: FinalStatus,
}

impl HistoryEntry {
    /// Decode the persisted indicator flag string, if well formed
    #[must_use]
    pub fn indicators(&self) -> Option<RiskIndicators> {
        RiskIndicators::from_flag_string(&self.risk_indicators)
    }
}
