//! Response cleanup helpers for the planning pipeline.

/// Strip a surrounding markdown code fence from a service response.
///
/// Reasoning services frequently wrap structured payloads in ```json fences
/// despite being asked not to. Leading and trailing fence lines are dropped;
/// anything else is returned trimmed but untouched.
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines = trimmed.lines();
    lines.next(); // opening fence, with or without a language tag
    let mut body: Vec<&str> = lines.collect();
    if body.last().map(|line| line.trim() == "```").unwrap_or(false) {
        body.pop();
    }
    body.join("\n").trim().to_string()
}

/// Shorten a value for single-line console display.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}
