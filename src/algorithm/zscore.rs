//! Height-for-age z-score computation
//!
//! A z-score expresses how far a child's height sits from the WHO reference
//! median for their sex and age, in units of the reference standard
//! deviation. When the score cannot be computed (no reference bracket, or
//! no measured height) the engine substitutes a fixed sentinel that treats
//! the unknown as borderline-low. The substitution is part of the engine
//! contract, not a caller choice.

use crate::error::{Result, ScreeningError};
use crate::models::Sex;
use crate::reference::GrowthReferenceTable;

/// Sentinel z-score substituted when no score can be computed
pub const Z_SCORE_SENTINEL: f64 = -2.0;

/// Compute the height-for-age z-score for a subject.
///
/// Returns `Ok(None)` when the table has no row for (sex, age) or when no
/// height was measured; callers must substitute [`Z_SCORE_SENTINEL`] before
/// any downstream use (or call [`zscore_or_sentinel`]).
///
/// # Errors
/// Returns `DataError` if the matched row carries a zero standard
/// deviation. The table loader already rejects such rows, so this can only
/// trigger on a hand-built table.
pub fn zscore(
    sex: Sex,
    age_months: u32,
    height_cm: Option<f64>,
    table: &GrowthReferenceTable,
) -> Result<Option<f64>> {
    let Some(height) = height_cm else {
        return Ok(None);
    };
    let Some(row) = table.lookup(sex, age_months) else {
        return Ok(None);
    };
    if row.sd_cm == 0.0 {
        return Err(ScreeningError::DataError(format!(
            "reference row ({sex}, {age_months} months) has zero standard deviation"
        )));
    }
    Ok(Some((height - row.median_cm) / row.sd_cm))
}

/// Compute the z-score with the mandatory sentinel substitution applied
pub fn zscore_or_sentinel(
    sex: Sex,
    age_months: u32,
    height_cm: Option<f64>,
    table: &GrowthReferenceTable,
) -> Result<f64> {
    Ok(zscore(sex, age_months, height_cm, table)?.unwrap_or(Z_SCORE_SENTINEL))
}
