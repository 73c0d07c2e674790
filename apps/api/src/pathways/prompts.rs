// Prompt constants for pathway generation.
// The system message is shared and lives in llm_client::prompts.

/// Literal schema the model must reproduce. Embedded verbatim in the prompt.
pub const RESPONSE_FORMAT: &str = r#"{
  "summary": "short overview",
  "pathways": [
    {
      "title": "",
      "best_for": "",
      "difficulty": "Easy|Medium|Hard",
      "timeline": "",
      "estimated_cost": "",
      "steps": ["", "", ""],
      "requirements": ["", "", ""],
      "documents": ["", "", ""],
      "official_links": [
        { "label": "", "url": "" }
      ],
      "warnings": ["", ""],
      "next_actions": ["", ""]
    }
  ]
}"#;

/// Pathway prompt template.
/// Replace in this order: {response_format}, {language_instruction}, {profile_json}.
/// The profile goes last so user text can never expand another placeholder.
pub const PATHWAY_PROMPT_TEMPLATE: &str = r#"User Profile:
{profile_json}

Task:
Suggest the best immigration pathways for this user to move abroad based on their goal (study/work/etc.). Provide 3–6 pathways, each with steps, requirements, estimated time/cost, and official links. Format in strict JSON.
{language_instruction}
AI Response Format (STRICT JSON)
Must return this exact JSON shape:
{response_format}
"#;

/// Added when the client asks for output in a specific language.
/// Replace {language} before use.
pub const LANGUAGE_INSTRUCTION_TEMPLATE: &str = "Write every text value in the language \
    \"{language}\". Keep all JSON keys and the difficulty values (Easy, Medium, Hard) in English.\n";
