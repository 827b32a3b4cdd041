//! A Rust library for screening child stunting risk: WHO growth-reference
//! z-scores, pretrained classifier inference, a heuristic risk overlay, and
//! a persisted assessment history.

pub mod algorithm;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod models;
pub mod reference;

// Re-export the most common types for easier use
// Core types
pub use config::EngineConfig;
pub use engine::ScreeningEngine;
pub use error::{Result, ScreeningError};
pub use models::{
    Assessment, ClassifierLabel, FinalStatus, HistoryEntry, RiskIndicators, Sex, StatusExplanation,
    SubjectRecord,
};

// Scoring
pub use algorithm::risk::{MAX_RISK_SCORE, adverse_factors, finalize, risk_score};
pub use algorithm::zscore::{Z_SCORE_SENTINEL, zscore, zscore_or_sentinel};
pub use classifier::{FEATURE_COUNT, FeatureVector, StuntingClassifier};
pub use reference::{GrowthReferenceTable, ReferenceRow};

// History
pub use history::{PredictionLog, TimeRange};
