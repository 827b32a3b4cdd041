//! Risk overlay engine
//!
//! Computes a small integer risk score from the six household indicators
//! and combines it with the classifier's label through a fixed decision
//! table. The thresholds are asymmetric: a normal label is flagged at two
//! risk factors, while a stunting label escalates only at three.

use crate::models::{ClassifierLabel, FinalStatus, RiskIndicators};

/// Maximum attainable risk score
pub const MAX_RISK_SCORE: u8 = 6;

/// One adverse household condition contributing to the risk score
struct AdverseCondition {
    /// Operator-facing name of the condition
    name: &'static str,
    /// Score contribution when the condition applies
    weight: u8,
    /// Whether the condition applies to a set of indicators
    applies: fn(&RiskIndicators) -> bool,
}

/// The fixed list of scored conditions, in source column order
const ADVERSE_CONDITIONS: [AdverseCondition; 6] = [
    AdverseCondition {
        name: "uninsured",
        weight: 1,
        applies: |r| !r.insured,
    },
    AdverseCondition {
        name: "no clean water access",
        weight: 1,
        applies: |r| !r.clean_water,
    },
    AdverseCondition {
        name: "no sanitary latrine",
        weight: 1,
        applies: |r| !r.sanitary_latrine,
    },
    AdverseCondition {
        name: "household smoking",
        weight: 1,
        applies: |r| r.household_smoking,
    },
    AdverseCondition {
        name: "comorbidity",
        weight: 1,
        applies: |r| r.comorbidity,
    },
    AdverseCondition {
        name: "maternal malnutrition during pregnancy",
        weight: 1,
        applies: |r| r.maternal_malnutrition,
    },
];

/// Sum the weights of the adverse conditions present in `indicators`
#[must_use]
pub fn risk_score(indicators: &RiskIndicators) -> u8 {
    ADVERSE_CONDITIONS
        .iter()
        .filter(|condition| (condition.applies)(indicators))
        .map(|condition| condition.weight)
        .sum()
}

/// Names of the adverse conditions present in `indicators`, for reporting
#[must_use]
pub fn adverse_factors(indicators: &RiskIndicators) -> Vec<&'static str> {
    ADVERSE_CONDITIONS
        .iter()
        .filter(|condition| (condition.applies)(indicators))
        .map(|condition| condition.name)
        .collect()
}

/// Combine the classifier label with the risk score.
///
/// Decision table, first match wins:
/// 1. Stunting with risk >= 3 becomes high-risk stunting.
/// 2. Normal with risk >= 2 becomes at-risk.
/// 3. Otherwise the label carries through unchanged.
#[must_use]
pub fn finalize(label: ClassifierLabel, risk_score: u8) -> FinalStatus {
    match label {
        ClassifierLabel::Stunting if risk_score >= 3 => FinalStatus::StuntingRisikoTinggi,
        ClassifierLabel::Normal if risk_score >= 2 => FinalStatus::BerisikoStunting,
        ClassifierLabel::Normal => FinalStatus::Normal,
        ClassifierLabel::Stunting => FinalStatus::Stunting,
    }
}
