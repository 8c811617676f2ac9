//! AnalysisResult — the fixed-schema output of one scoring request.
//!
//! Field names serialize in camelCase to match the browser client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for every score in the result.
pub const MAX_SCORE: u32 = 100;

/// Categorical label summarizing the overall score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorReadiness {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl InvestorReadiness {
    /// Nominal band for a score: 0–40 Poor, 41–60 Fair, 61–80 Good, 81–100 Excellent.
    ///
    /// Only used for diagnostics; the model's own label is never rewritten.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=40 => InvestorReadiness::Poor,
            41..=60 => InvestorReadiness::Fair,
            61..=80 => InvestorReadiness::Good,
            _ => InvestorReadiness::Excellent,
        }
    }
}

/// The six scored dimensions, each 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub content_clarity: u32,
    pub market_opportunity: u32,
    pub business_model: u32,
    pub financial_projections: u32,
    pub design_quality: u32,
    pub storytelling: u32,
}

impl Breakdown {
    fn named_scores(&self) -> [(&'static str, u32); 6] {
        [
            ("contentClarity", self.content_clarity),
            ("marketOpportunity", self.market_opportunity),
            ("businessModel", self.business_model),
            ("financialProjections", self.financial_projections),
            ("designQuality", self.design_quality),
            ("storytelling", self.storytelling),
        ]
    }
}

/// Written feedback. Each list is expected to hold 2–4 short entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub breakdown: Breakdown,
    pub feedback: Feedback,
    pub investor_readiness: InvestorReadiness,
}

/// A score outside 0–100 found in a decoded result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} = {value} (expected 0-{max})", max = MAX_SCORE)]
pub struct ScoreViolation {
    pub field: String,
    pub value: u32,
}

impl AnalysisResult {
    /// The fixed result substituted when the model reply cannot be used.
    pub fn placeholder() -> Self {
        AnalysisResult {
            overall_score: 75,
            breakdown: Breakdown {
                content_clarity: 80,
                market_opportunity: 72,
                business_model: 78,
                financial_projections: 65,
                design_quality: 82,
                storytelling: 73,
            },
            feedback: Feedback {
                strengths: strings(&[
                    "Clear problem-solution articulation",
                    "Strong visual presentation",
                    "Well-defined target market",
                ]),
                improvements: strings(&[
                    "Financial projections need more detail",
                    "Competitive analysis could be stronger",
                    "Go-to-market strategy requires clarification",
                ]),
                suggestions: strings(&[
                    "Add 3-year financial forecasts with assumptions",
                    "Include competitive differentiation matrix",
                    "Specify customer acquisition channels and costs",
                ]),
            },
            investor_readiness: InvestorReadiness::Good,
        }
    }

    /// Returns every score outside 0–100. Diagnostic only: the pipeline never
    /// rejects a reply because of it.
    pub fn validate(&self) -> Vec<ScoreViolation> {
        std::iter::once(("overallScore", self.overall_score))
            .chain(self.breakdown.named_scores())
            .filter(|(_, value)| *value > MAX_SCORE)
            .map(|(field, value)| ScoreViolation {
                field: field.to_string(),
                value,
            })
            .collect()
    }

    /// True when the model's readiness label matches the nominal band of its score.
    pub fn readiness_matches_band(&self) -> bool {
        InvestorReadiness::from_score(self.overall_score) == self.investor_readiness
    }
}

/// Whether a result came from the model or was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Model,
    Placeholder,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Model => "model",
            AnalysisSource::Placeholder => "placeholder",
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
