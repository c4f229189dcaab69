const MAX_VISIBLE_LENGTH: usize = 120;

/// Sanitizes prompt text for safe logging: truncates to a readable prefix
/// and redacts bearer tokens. Composed prompts embed whole documents, so
/// they never go to the logs in full.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let visible = match trimmed.char_indices().nth(MAX_VISIBLE_LENGTH) {
        Some((idx, _)) => format!("{}... ({} chars total)", &trimmed[..idx], trimmed.len()),
        None => trimmed.to_string(),
    };

    redact_bearer_tokens(&visible)
}

fn redact_bearer_tokens(text: &str) -> String {
    const PATTERN: &str = "Bearer ";

    let Some(idx) = text.find(PATTERN) else {
        return text.to_string();
    };

    let token_start = idx + PATTERN.len();
    let token_end = text[token_start..]
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .map(|i| token_start + i)
        .unwrap_or(text.len());

    format!("{}Bearer [REDACTED]{}", &text[..idx], &text[token_end..])
}
