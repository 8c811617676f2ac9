//! Scoring Pipeline — prompt → single model call → bounded-schema parse.
//!
//! Flow: build_analysis_prompt → ChatModel::complete → strip fences →
//!       decode AnalysisResult → log score diagnostics.
//!
//! A failed or empty model call is fatal. A reply that does not decode as an
//! AnalysisResult is replaced by `AnalysisResult::placeholder()` and tagged
//! `AnalysisSource::Placeholder`. A decoded reply is returned as-is: score
//! and readiness checks only log.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::models::{AnalysisResult, AnalysisSource};
use crate::analysis::prompts::{
    analysis_system, build_analysis_prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE,
};
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, ChatModel, CompletionRequest};

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAnalysis {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
}

/// A model reply that does not decode as an AnalysisResult.
#[derive(Debug, Error)]
#[error("not a valid AnalysisResult: {0}")]
struct InvalidReply(#[from] serde_json::Error);

/// Process-wide scoring pipeline, built once at startup around the model client.
#[derive(Clone)]
pub struct ScoringPipeline {
    model: Arc<dyn ChatModel>,
}

impl ScoringPipeline {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Scores extracted deck text with exactly one model call.
    pub async fn analyze(
        &self,
        analysis_id: Uuid,
        deck_text: &str,
    ) -> Result<ScoredAnalysis, AppError> {
        let request = CompletionRequest {
            system: analysis_system(),
            prompt: build_analysis_prompt(deck_text),
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: ANALYSIS_MAX_TOKENS,
            json_output: true,
        };

        info!(
            "[{analysis_id}] Requesting analysis from {} ({} chars of deck text)",
            self.model.model_name(),
            deck_text.chars().count()
        );

        let reply = self
            .model
            .complete(&request)
            .await
            .map_err(|e| AppError::Llm(format!("Pitch deck analysis failed: {e}")))?;

        Ok(match parse_reply(&reply) {
            Ok(result) => {
                let violations = result.validate();
                if !violations.is_empty() {
                    let fields: Vec<String> = violations.iter().map(ToString::to_string).collect();
                    warn!(
                        "[{analysis_id}] Model reply has out-of-range scores, returning as-is: {}",
                        fields.join(", ")
                    );
                }
                if !result.readiness_matches_band() {
                    debug!(
                        "[{analysis_id}] Readiness label {:?} disagrees with overall score {}",
                        result.investor_readiness, result.overall_score
                    );
                }
                ScoredAnalysis {
                    result,
                    source: AnalysisSource::Model,
                }
            }
            Err(rejection) => {
                warn!("[{analysis_id}] Model reply rejected, substituting placeholder: {rejection}");
                ScoredAnalysis {
                    result: AnalysisResult::placeholder(),
                    source: AnalysisSource::Placeholder,
                }
            }
        })
    }
}

fn parse_reply(reply: &str) -> Result<AnalysisResult, InvalidReply> {
    Ok(serde_json::from_str(strip_json_fences(reply))?)
}
