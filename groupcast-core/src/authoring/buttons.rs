//! Parser for operator-supplied URL button lines (`Label - https://url`)

use crate::models::LinkButton;
use thiserror::Error;

const SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ButtonParseError {
    /// A well-formed line carried a non-http(s) URL; the whole batch is rejected.
    #[error("invalid URL format for '{label}': {url}")]
    InvalidUrl { label: String, url: String },
    #[error("no valid buttons found")]
    NoButtons,
}

/// Case-insensitive `^https?://`.
pub fn is_web_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Parse one button per line, splitting on the first ` - `.
///
/// Lines without the separator are dropped. The first line with a non-web URL aborts the
/// whole parse. Output keeps input order and is never empty on success.
pub fn parse_button_lines(input: &str) -> Result<Vec<LinkButton>, ButtonParseError> {
    let mut buttons = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((label, url)) = line.split_once(SEPARATOR) else {
            continue;
        };
        let (label, url) = (label.trim(), url.trim());
        if !is_web_url(url) {
            return Err(ButtonParseError::InvalidUrl {
                label: label.to_string(),
                url: url.to_string(),
            });
        }
        buttons.push(LinkButton::new(label, url));
    }

    if buttons.is_empty() {
        return Err(ButtonParseError::NoButtons);
    }
    Ok(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_lines_without_separator() {
        let buttons = parse_button_lines("A - http://x.com\nBadLine\nB - https://y.com").unwrap();
        assert_eq!(
            buttons,
            vec![
                LinkButton::new("A", "http://x.com"),
                LinkButton::new("B", "https://y.com"),
            ]
        );
    }

    #[test]
    fn test_invalid_scheme_rejects_whole_batch() {
        assert_eq!(
            parse_button_lines("A - ftp://x.com"),
            Err(ButtonParseError::InvalidUrl {
                label: "A".into(),
                url: "ftp://x.com".into()
            })
        );
        assert!(matches!(
            parse_button_lines("Ok - https://ok.com\nBad - www.bad.com"),
            Err(ButtonParseError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let buttons = parse_button_lines("  Docs - https://x.com/a - b  ").unwrap();
        assert_eq!(buttons, vec![LinkButton::new("Docs", "https://x.com/a - b")]);
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let buttons = parse_button_lines("Go - HTTPS://Example.com\r\n").unwrap();
        assert_eq!(buttons[0].url, "HTTPS://Example.com");
    }

    #[test]
    fn test_no_recognized_lines_is_error() {
        assert_eq!(parse_button_lines(""), Err(ButtonParseError::NoButtons));
        assert_eq!(
            parse_button_lines("just text\n\nmore text"),
            Err(ButtonParseError::NoButtons)
        );
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("http://a"));
        assert!(is_web_url("HtTp://a"));
        assert!(!is_web_url("http:/a"));
        assert!(!is_web_url("tg://resolve"));
        assert!(!is_web_url("ß"));
    }
}
