//! Scoring algorithms for the screening workflow
//!
//! This module contains the pure scoring logic: the height-for-age z-score
//! computation against the WHO reference, and the heuristic risk overlay
//! that adjusts the classifier's label.

pub mod risk;
pub mod zscore;
