//! Text preparation for speech synthesis.

/// Character budget for one synthesis request.
pub const MAX_SPEECH_CHARS: usize = 2000;

const ELLIPSIS: &str = "...";

/// Strip emphasis markers and control characters, then cap the text at
/// `max_chars` characters followed by an ellipsis.
///
/// Newlines and tabs survive so paragraph breaks still read as pauses.
pub fn prepare_text(text: &str, max_chars: usize) -> String {
    let clean: String = text
        .chars()
        .filter(|c| !matches!(c, '*' | '#' | '_'))
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();

    match clean.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &clean[..cut]),
        None => clean,
    }
}
