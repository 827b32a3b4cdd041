//! WHO growth reference table
//!
//! The reference table maps (sex, age in months) to the median height and
//! standard deviation of the WHO height-for-age reference. It is loaded once
//! at process start, validated eagerly, and treated as read-only for the
//! process lifetime. A malformed table is rejected at load time, so a
//! missing bracket at lookup time is the only remaining miss condition.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Result, ScreeningError};
use crate::models::Sex;

/// One row of the WHO height-for-age reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRow {
    /// Sex the row applies to
    pub sex: Sex,
    /// Age in completed months
    pub age_months: u32,
    /// Median height for this sex and age, in centimeters
    pub median_cm: f64,
    /// Standard deviation of the reference distribution, in centimeters
    pub sd_cm: f64,
}

/// Raw CSV row, decoded before validation
#[derive(Debug, Deserialize)]
struct CsvReferenceRow {
    sex: String,
    age_months: u32,
    median: f64,
    sd: f64,
}

/// Immutable lookup table over the WHO reference rows
#[derive(Debug, Clone)]
pub struct GrowthReferenceTable {
    rows: FxHashMap<(Sex, u32), ReferenceRow>,
}

impl GrowthReferenceTable {
    /// Build a table from already-typed rows, validating each one.
    ///
    /// # Errors
    /// Returns `DataError` for a non-finite median, a standard deviation
    /// that is zero, negative or non-finite, or a duplicate (sex, age) key.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> Result<Self> {
        let mut table = FxHashMap::default();
        for row in rows {
            if !row.median_cm.is_finite() {
                return Err(ScreeningError::DataError(format!(
                    "reference row ({}, {} months) has a non-finite median",
                    row.sex, row.age_months
                )));
            }
            if !row.sd_cm.is_finite() || row.sd_cm <= 0.0 {
                return Err(ScreeningError::DataError(format!(
                    "reference row ({}, {} months) has an unusable standard deviation {}",
                    row.sex, row.age_months, row.sd_cm
                )));
            }
            if table.insert((row.sex, row.age_months), row).is_some() {
                return Err(ScreeningError::DataError(format!(
                    "duplicate reference row for ({}, {} months)",
                    row.sex, row.age_months
                )));
            }
        }
        Ok(Self { rows: table })
    }

    /// Load the table from a CSV file with columns `sex,age_months,median,sd`
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ScreeningError::DataError(format!(
                "failed to open reference table {}: {e}",
                path.display()
            ))
        })?;
        let table = Self::from_reader(file)?;
        log::info!(
            "Loaded {} growth reference rows from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load the table from any CSV reader with columns `sex,age_months,median,sd`
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for (index, result) in csv_reader.deserialize::<CsvReferenceRow>().enumerate() {
            // Header is line 1, so the first data row is line 2
            let line = index + 2;
            let raw = result.map_err(|e| {
                ScreeningError::DataError(format!("reference table line {line}: {e}"))
            })?;
            let sex = Sex::parse(&raw.sex).ok_or_else(|| {
                ScreeningError::DataError(format!(
                    "reference table line {line}: unrecognized sex code {:?}",
                    raw.sex
                ))
            })?;
            rows.push(ReferenceRow {
                sex,
                age_months: raw.age_months,
                median_cm: raw.median,
                sd_cm: raw.sd,
            });
        }
        Self::from_rows(rows)
    }

    /// Look up the reference row for a sex and age, if one exists
    #[must_use]
    pub fn lookup(&self, sex: Sex, age_months: u32) -> Option<&ReferenceRow> {
        self.rows.get(&(sex, age_months))
    }

    /// Number of rows in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
