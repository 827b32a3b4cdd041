//! Subject record model
//!
//! This module contains the `SubjectRecord` entity, the per-assessment input
//! to the screening engine, and the household risk indicators collected with
//! it. A record is built once per assessment and never mutated afterwards.

use std::ops::RangeInclusive;

use itertools::Itertools;

use super::types::Sex;
use crate::error::{Result, ScreeningError};

/// The six household risk indicators collected with each assessment
///
/// The first three are protective (their absence is adverse), the last
/// three are adverse when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RiskIndicators {
    /// Covered by national health insurance
    pub insured: bool,
    /// Household has clean water access
    pub clean_water: bool,
    /// Household has a sanitary latrine
    pub sanitary_latrine: bool,
    /// Someone in the household smokes
    pub household_smoking: bool,
    /// The child has a comorbid condition
    pub comorbidity: bool,
    /// Maternal malnutrition during pregnancy
    pub maternal_malnutrition: bool,
}

impl RiskIndicators {
    /// Serialize to the persisted flag string: comma-joined raw 0/1 codes in
    /// source column order (insured, clean water, latrine, smoking,
    /// comorbidity, maternal malnutrition).
    #[must_use]
    pub fn flag_string(&self) -> String {
        [
            self.insured,
            self.clean_water,
            self.sanitary_latrine,
            self.household_smoking,
            self.comorbidity,
            self.maternal_malnutrition,
        ]
        .iter()
        .map(|&flag| u8::from(flag))
        .join(",")
    }

    /// Decode a persisted flag string. Returns `None` unless the string is
    /// exactly six comma-separated 0/1 codes.
    #[must_use]
    pub fn from_flag_string(s: &str) -> Option<Self> {
        let flags: Vec<bool> = s
            .split(',')
            .map(|part| match part.trim() {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            })
            .collect::<Option<_>>()?;
        if flags.len() != 6 {
            return None;
        }
        Some(Self {
            insured: flags[0],
            clean_water: flags[1],
            sanitary_latrine: flags[2],
            household_smoking: flags[3],
            comorbidity: flags[4],
            maternal_malnutrition: flags[5],
        })
    }
}

/// A single child's data as submitted for assessment
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    /// Sex of the child
    pub sex: Sex,
    /// Age in completed months (0 to 60)
    pub age_months: u32,
    /// Height in centimeters, if measured
    pub height_cm: Option<f64>,
    /// Household risk indicators
    pub indicators: RiskIndicators,
}

impl SubjectRecord {
    /// Oldest supported age, in months
    pub const MAX_AGE_MONTHS: u32 = 60;

    /// Plausible height range accepted for scoring, in centimeters
    pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 30.0..=130.0;

    /// Check that the record is complete and in range for scoring.
    ///
    /// A record with a missing height can still receive a sentinel z-score,
    /// but it can never be fed to the classifier, so it fails here. Every
    /// problem is reported, not just the first one found.
    pub fn validate_for_scoring(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.age_months > Self::MAX_AGE_MONTHS {
            problems.push(format!(
                "age {} months is above the supported maximum of {}",
                self.age_months,
                Self::MAX_AGE_MONTHS
            ));
        }

        match self.height_cm {
            None => problems.push("height is missing".to_string()),
            Some(height) if !height.is_finite() => {
                problems.push(format!("height {height} is not a number"));
            }
            Some(height) if !Self::HEIGHT_RANGE_CM.contains(&height) => {
                problems.push(format!(
                    "height {height} cm is outside the plausible range {:?}",
                    Self::HEIGHT_RANGE_CM
                ));
            }
            Some(_) => {}
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ScreeningError::InvalidInput(problems.join("; ")))
        }
    }
}
