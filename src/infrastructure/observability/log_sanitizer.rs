const MAX_VISIBLE_CHARS: usize = 100;

/// Shortens free-form text (prompts, model output) for log lines so a
/// single debug event cannot flood the sink.
pub fn truncate_for_log(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    if trimmed.chars().count() <= MAX_VISIBLE_CHARS {
        return trimmed.to_string();
    }

    let visible: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
    format!("{}... ({} chars total)", visible, trimmed.chars().count())
}
