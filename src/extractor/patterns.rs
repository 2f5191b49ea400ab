//! Lexical building blocks for prompt validation: descriptive indicators and
//! UI-chrome tokens.

/// Words whose presence marks a candidate string as plausibly descriptive
/// prose rather than page chrome.
pub const PROMPT_INDICATORS: &[&str] = &[
    "camera", "scene", "shot", "frame", "view", "angle", "light", "shows", "reveals", "captures",
    "depicts", "begins", "moves", "person", "people", "landscape", "building", "room",
];

/// Substrings that mark a candidate string as UI chrome rather than a prompt.
pub const UI_TOKENS: &[&str] = &[
    "download", "click", "button", "menu", "option", "settings", "error", "loading", "\u{a9}",
    "\u{ae}", "\u{2122}",
];
