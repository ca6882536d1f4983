//! Syntax highlighting of example payloads and schemas into HTML.

use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::{Raml2HtmlError, Result};

/// Lazily loaded syntect syntax definitions including newline handling.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
/// Shared theme catalog for syntax highlighting.
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
/// Light theme suited to a white documentation page.
static HTML_THEME: Lazy<Option<&'static Theme>> =
    Lazy::new(|| THEME_SET.themes.get("InspiredGitHub"));

/// Picks a syntax for a snippet by looking at its content.
///
/// The first line is tried against syntect's own first-line patterns (XML
/// declarations, shebangs), then a few structural guesses, then plain text.
pub fn detect_syntax(code: &str) -> &'static SyntaxReference {
    let trimmed = code.trim_start();
    if let Some(syntax) = SYNTAX_SET.find_syntax_by_first_line(trimmed) {
        return syntax;
    }

    let extension = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Some("json")
    } else if trimmed.starts_with('<') {
        if trimmed.to_ascii_lowercase().contains("<html") {
            Some("html")
        } else {
            Some("xml")
        }
    } else if trimmed.starts_with("---") || looks_like_yaml(trimmed) {
        Some("yaml")
    } else {
        None
    };

    extension
        .and_then(|ext| SYNTAX_SET.find_syntax_by_extension(ext))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// A first line of the form `key: value` or `key:`.
fn looks_like_yaml(code: &str) -> bool {
    let first = code.lines().next().unwrap_or_default();
    first
        .split_once(':')
        .is_some_and(|(key, rest)| {
            !key.is_empty()
                && !key.contains(char::is_whitespace)
                && (rest.is_empty() || rest.starts_with(' '))
        })
}

/// Applies syntax highlighting to a snippet, producing HTML spans with inline
/// styles. Text is HTML-escaped, including snippets that fall back to plain
/// text.
pub fn highlight_html(code: &str) -> Result<String> {
    let theme = (*HTML_THEME)
        .ok_or_else(|| Raml2HtmlError::Highlight("InspiredGitHub theme not found".to_string()))?;
    let mut h = HighlightLines::new(detect_syntax(code), theme);

    let mut output = String::new();
    for line in LinesWithEndings::from(code) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &SYNTAX_SET)?;
        output.push_str(&styled_line_to_highlighted_html(
            &ranges[..],
            IncludeBackground::No,
        )?);
    }

    Ok(output)
}
