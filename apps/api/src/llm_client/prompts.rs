// Shared prompt fragments used by every generation call.
// Prompt templates specific to brochure generation live in generation::prompts.

/// System prompt that enforces JSON-only brochure output.
pub const BROCHURE_DESIGNER_SYSTEM: &str = "You are a professional brochure designer. \
    Generate only valid JSON objects for brochure content. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
