// Shared prompt fragments.
// Each feature module that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to system prompts that require JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Always respond with valid JSON only, no additional text. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
