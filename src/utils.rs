//! Small string helpers shared by the report renderers.

/// Shorten `s` to at most `max_chars` characters, ending with `...` when
/// anything was cut.
///
/// Counts characters, not bytes, so multi-byte names are never split.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
