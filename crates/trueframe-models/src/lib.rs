//! Shared data models for the TrueFrame backend.
//!
//! This crate provides Serde-serializable types for:
//! - The FAKE/REAL verdict
//! - Diagnostic breakdown categories, tags and items
//! - The analysis report returned to API callers

pub mod report;

// Re-export common types
pub use report::{AnalysisReport, BreakdownCategory, BreakdownItem, BreakdownTag, Verdict};
