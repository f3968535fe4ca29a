/// Pull the JSON payload out of an LLM completion.
///
/// Models asked for strict JSON still tend to wrap it in markdown fences or
/// prefix it with prose. Handles, in order: a ```json fenced block, a bare
/// ``` fenced block, and raw text trimmed to the outermost braces.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let body = &trimmed[start + fence.len()..];
            if let Some(end) = body.find("```") {
                return body[..end].trim();
            }
        }
    }

    // No fences: trim to the outermost object if one is present
    if let (Some(open), Some(close)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if open < close {
            return trimmed[open..=close].trim();
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn extracts_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn trims_surrounding_prose() {
        let text = "The result is {\"a\": 1} as requested.";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn passes_through_raw_json() {
        assert_eq!(extract_json_block("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn returns_input_when_no_json_found() {
        assert_eq!(extract_json_block("no json here"), "no json here");
    }
}
