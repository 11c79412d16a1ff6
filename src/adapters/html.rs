use crate::utils::error::RetrievalError;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]{1,24}\]").expect("citation regex is valid"));

pub fn selector(css: &str) -> Result<Selector, RetrievalError> {
    Selector::parse(css)
        .map_err(|e| RetrievalError::parse(format!("Failed to parse selector '{}': {:?}", css, e)))
}

/// Collapses whitespace and strips bracketed citation markers such as `[1]`.
pub fn clean_text(raw: &str) -> String {
    let without_citations = CITATION_MARKER.replace_all(raw, " ");
    without_citations.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
}

/// 只將第一個字元轉大寫，其餘保持原樣
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"navi  mumbai"` -> `["Navi", "Mumbai"]`
pub fn title_case_words(input: &str) -> Vec<String> {
    input.split_whitespace().map(capitalize_first).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_citations_and_whitespace() {
        assert_eq!(
            clean_text("Mumbai[1] is the capital\n  of Maharashtra.[a][citation needed]"),
            "Mumbai is the capital of Maharashtra."
        );
    }

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case_words("  navi   mumbai "), vec!["Navi", "Mumbai"]);
        assert_eq!(title_case_words("USA"), vec!["USA"]);
        assert!(title_case_words("   ").is_empty());
    }

    #[test]
    fn test_capitalize_first_keeps_the_rest() {
        assert_eq!(capitalize_first("statue of unity"), "Statue of unity");
        assert_eq!(capitalize_first("iPhone"), "IPhone");
        assert_eq!(capitalize_first("élan"), "Élan");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        let err = selector("div[").unwrap_err();
        assert_eq!(err.code(), "parse_failure");
    }
}
