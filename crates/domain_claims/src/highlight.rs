//! Keyword highlighting
//!
//! The model is asked to quote the phrases that drove its classification in
//! `extraction_explanation`. Those quoted phrases are pulled back out and
//! marked in the original claim text.
//!
//! Keywords are applied one after another over the already-marked text, so a
//! later keyword can match inside markup inserted by an earlier one. Because
//! the markup itself is text, every pass can multiply the output; the keyword
//! count and the final size are therefore capped.

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("quoted phrase pattern is valid"));

/// Opening markup wrapped around each match
pub const MARK_OPEN: &str = "<span style=\"background-color: #ffeb3b; color: #000000; \
padding: 2px 4px; border-radius: 3px; font-weight: bold;\">";

/// Closing markup wrapped around each match
pub const MARK_CLOSE: &str = "</span>";

/// Most keywords applied to one text
pub const MAX_KEYWORDS: usize = 32;

/// Keywords longer than this (in characters) are skipped
pub const MAX_KEYWORD_CHARS: usize = 256;

/// Upper bound on the marked output, in bytes
pub const MAX_HIGHLIGHT_BYTES: usize = 4 * 1024 * 1024;

/// Highlighting refused because its output would be unbounded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("Too many keywords to highlight: {count} (limit {limit})")]
    TooManyKeywords { count: usize, limit: usize },

    #[error("Highlighted text would exceed {limit} bytes")]
    OutputTooLarge { limit: usize },
}

/// Result of highlighting a claim against its explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Highlights {
    /// The explanation quoted nothing; text is unmodified
    NoKeywords { text: String },
    /// Quoted phrases were found and applied
    Marked { keywords: Vec<String>, html: String },
    /// Highlighting was refused; text is unmodified
    Skipped { text: String, reason: String },
}

impl Highlights {
    /// The text to display, marked or not
    pub fn text(&self) -> &str {
        match self {
            Highlights::NoKeywords { text } | Highlights::Skipped { text, .. } => text,
            Highlights::Marked { html, .. } => html,
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            Highlights::NoKeywords { .. } | Highlights::Skipped { .. } => &[],
            Highlights::Marked { keywords, .. } => keywords,
        }
    }
}

/// Quoted phrases in the explanation, left to right, duplicates kept
pub fn extract_keywords(explanation: &str) -> Vec<String> {
    QUOTED
        .captures_iter(explanation)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Wraps every case-insensitive occurrence of each keyword in markup
///
/// Longer keywords are applied first; equal lengths keep their given order.
/// The size of each pass is computed before it runs, so an oversized result
/// is never allocated.
pub fn highlight(text: &str, keywords: &[String]) -> Result<String, HighlightError> {
    let mut ordered: Vec<&str> = keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();
    if ordered.len() > MAX_KEYWORDS {
        return Err(HighlightError::TooManyKeywords {
            count: ordered.len(),
            limit: MAX_KEYWORDS,
        });
    }
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let markup_len = MARK_OPEN.len() + MARK_CLOSE.len();
    let mut marked = text.to_string();
    for keyword in ordered {
        if keyword.chars().count() > MAX_KEYWORD_CHARS {
            warn!(chars = keyword.chars().count(), "Skipping overlong highlight keyword");
            continue;
        }
        let pattern = match RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(keyword, error = %e, "Skipping highlight keyword");
                continue;
            }
        };

        let matches = pattern.find_iter(&marked).count();
        let projected = matches
            .checked_mul(markup_len)
            .and_then(|extra| extra.checked_add(marked.len()));
        if !projected.is_some_and(|len| len <= MAX_HIGHLIGHT_BYTES) {
            return Err(HighlightError::OutputTooLarge {
                limit: MAX_HIGHLIGHT_BYTES,
            });
        }

        marked = pattern
            .replace_all(&marked, |caps: &Captures| {
                format!("{MARK_OPEN}{}{MARK_CLOSE}", &caps[0])
            })
            .into_owned();
    }
    Ok(marked)
}

/// Extracts keywords from the explanation and marks them in the claim text
pub fn highlight_explanation(
    claim_text: &str,
    explanation: &str,
) -> Result<Highlights, HighlightError> {
    let keywords = extract_keywords(explanation);
    if keywords.is_empty() {
        return Ok(Highlights::NoKeywords {
            text: claim_text.to_string(),
        });
    }

    let html = highlight(claim_text, &keywords)?;
    Ok(Highlights::Marked { keywords, html })
}

/// Like [`highlight_explanation`], falling back to the unmarked text
///
/// Used where the explanation comes from the model and a refusal must not
/// fail the surrounding request.
pub fn highlight_or_skip(claim_text: &str, explanation: &str) -> Highlights {
    highlight_explanation(claim_text, explanation).unwrap_or_else(|e| {
        warn!(error = %e, "Highlighting skipped");
        Highlights::Skipped {
            text: claim_text.to_string(),
            reason: e.to_string(),
        }
    })
}
