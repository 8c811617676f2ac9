use crate::analysis::pipeline::ScoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup from the provider credential.
    /// `None` when the credential is missing: every analysis request then fails with 500.
    pub pipeline: Option<ScoringPipeline>,
}
