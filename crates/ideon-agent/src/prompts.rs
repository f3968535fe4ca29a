//! Prompt templates for the scoring steps and the idea chat agent.
//!
//! All scorer prompts demand strict JSON; the extractor in `extract` still
//! tolerates fenced output.

pub const EFFORT_SYSTEM_PROMPT: &str = "You are an experienced project manager. \
You estimate implementation effort for product ideas and reply with strict JSON only.";

pub const ROI_SYSTEM_PROMPT: &str = "You are a seasoned business strategist. \
You estimate the return on investment of product ideas and reply with strict JSON only.";

/// Effort scorer user prompt
pub fn effort_prompt(description: &str) -> String {
    format!(
        r#"Evaluate the implementation effort for the following idea:
"{description}"

Consider time (in weeks), required resources, external dependencies, and overall complexity (low/medium/high).
Return a JSON object with:
- "effort_score": a float strictly between 0 and 1 (0 = trivial, 1 = maximal effort),
- "reasoning": a brief explanation,
- "details": an object with "time_needed", "resources", "dependencies", "complexity"."#
    )
}

/// ROI scorer user prompt, grounded with web search context
pub fn roi_prompt(description: &str, search_context: &str) -> String {
    format!(
        r#"Evaluate the potential ROI of the following idea:
"{description}"

External market context gathered by web search:
{search_context}

Consider value creation, user demand, and strategic business impact.
Return a JSON object with:
- "roi_score": a float strictly between 0 and 1,
- "reasoning": a brief explanation,
- "details": an object with "value_created", "user_demand", "business_impact"."#
    )
}

/// System prompt for the per-idea chat agent
pub fn chat_system_prompt(description: &str, roi_score: f64, effort_score: f64) -> String {
    format!(
        r#"You are an assistant helping a user evaluate their business idea. The idea is:

Description: {description}
ROI score: {roi_score:.2}
Effort score: {effort_score:.2}

Answer the user's questions about this idea, or collect their feedback on it."#
    )
}
