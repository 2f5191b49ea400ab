//! Prompt candidate validation.

use crate::utils::constants::{PROMPT_MAX_LEN, PROMPT_MIN_LEN};

use super::patterns::{PROMPT_INDICATORS, UI_TOKENS};

/// True if `candidate` clears every prompt validation rule: length bounds,
/// at least one descriptive indicator, no UI chrome tokens, at least one
/// letter, at least three whitespace-separated words.
#[must_use]
pub fn is_valid_prompt(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    let len = trimmed.chars().count();
    if len < PROMPT_MIN_LEN || len > PROMPT_MAX_LEN {
        return false;
    }
    let lower = trimmed.to_lowercase();
    if UI_TOKENS.iter().any(|tok| lower.contains(tok)) {
        return false;
    }
    if !PROMPT_INDICATORS.iter().any(|tok| lower.contains(tok)) {
        return false;
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return false;
    }
    trimmed.split_whitespace().count() >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_descriptive_prompt() {
        let text = "The camera shot shows a wide landscape view of a building \
            as the scene begins, with soft light moving across the room.";
        assert!(is_valid_prompt(text));
    }

    #[test]
    fn rejects_too_short() {
        assert!(!is_valid_prompt("a camera shot"));
    }

    #[test]
    fn rejects_ui_chrome() {
        let text = "Click the download button in the settings menu to begin \
            the camera capture of this scene, a prompt-length filler string.";
        assert!(!is_valid_prompt(text));
    }

    #[test]
    fn rejects_missing_indicator() {
        let filler = "x".repeat(60);
        assert!(!is_valid_prompt(&filler));
    }

    #[test]
    fn rejects_single_word() {
        let word = format!("scene{}", "x".repeat(60));
        assert!(!is_valid_prompt(&word));
    }
}
