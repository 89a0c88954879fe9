//! Analysis report models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary authenticity verdict for an analyzed video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The video is synthetically manipulated
    Fake,
    /// The video is authentic
    Real,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
        }
    }

    /// Whether this verdict flags the video as manipulated.
    pub fn is_fake(&self) -> bool {
        matches!(self, Verdict::Fake)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic category reported in the analysis breakdown.
///
/// Exactly four categories exist; every breakdown contains each of them once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BreakdownCategory {
    #[serde(rename = "Facial Inconsistencies")]
    FacialInconsistencies,
    #[serde(rename = "Temporal Artifacts")]
    TemporalArtifacts,
    #[serde(rename = "Compression Patterns")]
    CompressionPatterns,
    #[serde(rename = "Motion Analysis")]
    MotionAnalysis,
}

impl BreakdownCategory {
    /// All categories in their canonical (pre-shuffle) order.
    pub const ALL: [BreakdownCategory; 4] = [
        BreakdownCategory::FacialInconsistencies,
        BreakdownCategory::TemporalArtifacts,
        BreakdownCategory::CompressionPatterns,
        BreakdownCategory::MotionAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownCategory::FacialInconsistencies => "Facial Inconsistencies",
            BreakdownCategory::TemporalArtifacts => "Temporal Artifacts",
            BreakdownCategory::CompressionPatterns => "Compression Patterns",
            BreakdownCategory::MotionAnalysis => "Motion Analysis",
        }
    }
}

impl fmt::Display for BreakdownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative label attached to a breakdown category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BreakdownTag {
    High,
    Detected,
    Suspicious,
    Natural,
}

impl BreakdownTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownTag::High => "High",
            BreakdownTag::Detected => "Detected",
            BreakdownTag::Suspicious => "Suspicious",
            BreakdownTag::Natural => "Natural",
        }
    }
}

impl fmt::Display for BreakdownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the diagnostic breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BreakdownItem {
    /// Diagnostic category
    pub name: BreakdownCategory,
    /// Qualitative label for the category
    pub tag: BreakdownTag,
}

impl BreakdownItem {
    pub fn new(name: BreakdownCategory, tag: BreakdownTag) -> Self {
        Self { name, tag }
    }
}

/// Final analysis result returned to API callers.
///
/// The breakdown is rule-derived from the confidence score, not an
/// independent measurement; see the engine's breakdown module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// FAKE or REAL verdict
    pub prediction: Verdict,
    /// Confidence percentage in [50, 100], formatted with two fractional digits
    pub confidence: String,
    /// Four diagnostic items, one per category, in randomized order
    pub breakdown: Vec<BreakdownItem>,
}

impl AnalysisReport {
    /// Build a report, formatting the confidence score to two decimals.
    pub fn new(prediction: Verdict, confidence: f64, breakdown: Vec<BreakdownItem>) -> Self {
        Self {
            prediction,
            confidence: format!("{:.2}", confidence),
            breakdown,
        }
    }
}
