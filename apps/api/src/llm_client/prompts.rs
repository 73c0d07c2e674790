// Cross-cutting prompt fragments shared by every provider call.
// Feature-specific prompts live in a prompts.rs next to the feature.

/// System prompt for every pathway generation call.
pub const ADVISOR_SYSTEM: &str = "You are an immigration assistant. \
    Provide only general informational guidance. \
    Do not provide legal advice. \
    Always recommend official government sources and include direct links. \
    Be transparent when unsure. \
    Avoid hallucinating.";

/// Fixed prompt for credential checks. The reply is never inspected.
pub const CONNECTIVITY_PROMPT: &str = "Respond with 'Yes' if you can read this.";

/// Token cap for the connectivity prompt on providers that accept one.
pub const CONNECTIVITY_MAX_TOKENS: u32 = 5;
