//! Parsers for Slither's text output.
//!
//! Slither prints semi-structured, ANSI-colored text. Output is first
//! normalized, then scanned line by line: `summary` pulls the fixed-shape
//! metrics out of `--print human-summary`, `findings` matches detector
//! lines from a plain run against the static `catalog`.

pub mod catalog;
pub mod findings;
pub mod summary;

use std::sync::OnceLock;

use regex::Regex;

static ANSI_COLOR: OnceLock<Regex> = OnceLock::new();

fn ansi_color_regex() -> &'static Regex {
    ANSI_COLOR.get_or_init(|| Regex::new(r"\x1b\[\d+m").expect("Invalid ANSI regex"))
}

/// Strip ANSI color codes, convert CRLF to LF and trim surrounding whitespace.
pub fn normalize_output(raw: &str) -> String {
    let stripped = ansi_color_regex().replace_all(raw, "");
    stripped.replace("\r\n", "\n").trim().to_string()
}

/// Non-empty, trimmed lines of normalized output.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_colors_and_carriage_returns() {
        let raw = "\u{1b}[92mNumber of high issues: 3\u{1b}[0m\r\nERCs: ERC20\r\n";
        assert_eq!(normalize_output(raw), "Number of high issues: 3\nERCs: ERC20");
    }

    #[test]
    fn matches_manually_stripped_input() {
        let colored = "  \u{1b}[31mReentrancy in Bank.withdraw()\u{1b}[0m\r\n\u{1b}[1mINFO:Detectors:\r\n  ";
        let manual = "Reentrancy in Bank.withdraw()\nINFO:Detectors:";
        assert_eq!(normalize_output(colored), manual);
    }

    #[test]
    fn normalizing_is_idempotent() {
        let once = normalize_output("\u{1b}[93mTotal number of contracts: 2\u{1b}[0m\r\n\r\n");
        assert_eq!(normalize_output(&once), once);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_output(""), "");
        assert_eq!(normalize_output(" \r\n\t"), "");
    }

    #[test]
    fn only_simple_color_codes_are_removed() {
        // Compound SGR sequences are outside the stripped pattern.
        let raw = "\u{1b}[1;31mbold red";
        assert_eq!(normalize_output(raw), raw);
    }

    #[test]
    fn content_lines_skips_blanks() {
        let lines: Vec<&str> = content_lines("a\n\n   \n  b  \n").collect();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
