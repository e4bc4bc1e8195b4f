use regex::Regex;
use std::sync::OnceLock;

/// Collapses every whitespace run (newlines included) to one space and trims.
pub fn normalize_text(raw: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

    whitespace.replace_all(raw, " ").trim().to_string()
}

/// Folds `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
