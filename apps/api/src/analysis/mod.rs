// Pitch deck scoring: prompt construction, the single model call, and
// bounded-schema parsing with a deterministic placeholder fallback.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
