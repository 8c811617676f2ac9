// Pitch deck analysis prompt templates.
// All prompts for the analysis module are defined here.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Maximum number of deck characters embedded in the prompt.
pub const MAX_DECK_CHARS: usize = 8000;

/// Low temperature biases the model toward consistent scoring.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

const ANALYSIS_SYSTEM_PREFIX: &str = "You are an expert VC analyst.";

/// Analysis prompt template. Replace `{deck_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert venture capital analyst with 15+ years of experience evaluating startup pitch decks.

Analyze the following pitch deck content and provide a comprehensive evaluation. Score the 6 areas investors care about most:

1. CONTENT CLARITY (0-100): How well the deck articulates the problem, solution, and value proposition
2. MARKET OPPORTUNITY (0-100): Market size, growth potential, and competitive landscape
3. BUSINESS MODEL (0-100): Revenue model clarity, unit economics, and scalability
4. FINANCIAL PROJECTIONS (0-100): Quality and realism of financial forecasts and assumptions
5. DESIGN QUALITY (0-100): Visual appeal, slide flow, and information hierarchy
6. STORYTELLING (0-100): Narrative coherence and investor engagement

Across these areas, provide:
- 2-3 specific strengths (what is working well)
- 2-3 areas for improvement (what needs work)
- 2-3 actionable suggestions (how to improve)

Also provide:
- An overall score (weighted average of the 6 areas)
- Investor readiness level (Poor: 0-40, Fair: 41-60, Good: 61-80, Excellent: 81-100)

PITCH DECK CONTENT:
{deck_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "overallScore": number,
  "breakdown": {
    "contentClarity": number,
    "marketOpportunity": number,
    "businessModel": number,
    "financialProjections": number,
    "designQuality": number,
    "storytelling": number
  },
  "feedback": {
    "strengths": ["strength1", "strength2", "strength3"],
    "improvements": ["improvement1", "improvement2", "improvement3"],
    "suggestions": ["suggestion1", "suggestion2", "suggestion3"]
  },
  "investorReadiness": "Poor" | "Fair" | "Good" | "Excellent"
}

RULES:
1. Every score is an integer from 0 to 100
2. Return ONLY the JSON object — nothing else, no code fences."#;

/// System prompt for the analysis call.
pub fn analysis_system() -> String {
    format!("{ANALYSIS_SYSTEM_PREFIX} {JSON_ONLY_INSTRUCTION}")
}

/// Returns the first `max` characters of `text`, borrowing when no cut is needed.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the user prompt, embedding at most `MAX_DECK_CHARS` of deck text.
pub fn build_analysis_prompt(deck_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{deck_text}", truncate_chars(deck_text, MAX_DECK_CHARS))
}
