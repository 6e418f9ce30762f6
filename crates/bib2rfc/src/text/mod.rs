//! Text normalization shared by the record model and both serializers.
//!
//! Field values arrive with the grouping braces and accent escapes of the BibTeX source still in
//! place. The helpers here never mutate their input, they always return a normalized copy.

pub mod accent;
pub mod names;

pub use accent::{extract_ascii, transliterate};
pub use names::{normalize_names, parse_names};

/// Returns the text inside a single pair of grouping braces when the opening brace at the start
/// closes at the very end of `s`.
///
/// `"{Foo} and {Bar}"` is not enclosed even though it starts with `{` and ends with `}`.
#[must_use]
pub fn strip_enclosing(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                // the leading brace was closed before the end
                depth = depth.checked_sub(1)?;
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

/// Strips up to two layers of enclosing grouping braces and collapses every run of whitespace,
/// newlines included, to a single space.
#[must_use]
pub fn normalize_field(raw: &str) -> String {
    let mut value = raw.trim();
    for _ in 0..2 {
        match strip_enclosing(value) {
            Some(inner) => value = inner.trim(),
            None => break,
        }
    }
    collapse_whitespace(value)
}

/// Collapses runs of whitespace to a single space and trims both ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces every literal `\n` escape in `s` with `newline`.
#[must_use]
pub fn replace_escaped_newlines(s: &str, newline: &str) -> String {
    s.replace("\\n", newline)
}

/// Byte offsets of every occurrence of `token` in `s` that is not nested inside grouping braces.
pub(crate) fn top_level_matches(s: &str, token: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut skip_until = 0;

    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && s[i..].starts_with(token) => {
                found.push(i);
                skip_until = i + token.len();
            }
            _ => {}
        }
    }

    found
}

/// Splits `s` on every top-level occurrence of `token`.
pub(crate) fn split_top_level<'a>(s: &'a str, token: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for i in top_level_matches(s, token) {
        parts.push(&s[start..i]);
        start = i + token.len();
    }
    parts.push(&s[start..]);
    parts
}

/// Normalizes a month name or abbreviation to its number, `"Jul"` and `"july"` both become
/// `"7"`. Unrecognized values are returned unchanged.
#[must_use]
pub fn normalize_month(month: &str) -> String {
    let number = match month.trim().to_lowercase().as_str() {
        "jan" | "january" => "1",
        "feb" | "february" => "2",
        "mar" | "march" => "3",
        "apr" | "april" => "4",
        "may" => "5",
        "jun" | "june" => "6",
        "jul" | "july" => "7",
        "aug" | "august" => "8",
        "sep" | "september" => "9",
        "oct" | "october" => "10",
        "nov" | "november" => "11",
        "dec" | "december" => "12",
        _ => return month.to_owned(),
    };
    number.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_enclosing_requires_matching_outer_pair() {
        assert_eq!(Some("Foo"), strip_enclosing("{Foo}"));
        assert_eq!(Some("{Foo}"), strip_enclosing("{{Foo}}"));
        assert_eq!(None, strip_enclosing("{Foo} and {Bar}"));
        assert_eq!(None, strip_enclosing("Foo"));
    }

    #[test]
    fn normalize_field_strips_at_most_two_layers() {
        assert_eq!("Title", normalize_field("{{Title}}"));
        assert_eq!("{Title}", normalize_field("{{{Title}}}"));
        assert_eq!("{A} and {B}", normalize_field("{A} and {B}"));
    }

    #[test]
    fn normalize_field_collapses_newlines() {
        assert_eq!(
            "A long title over lines",
            normalize_field("{A long\n    title over\nlines}")
        );
    }

    #[test]
    fn split_top_level_ignores_nested_tokens() {
        assert_eq!(
            vec!["{Smith and Sons}", "Jane Doe"],
            split_top_level("{Smith and Sons} and Jane Doe", " and ")
        );
        assert_eq!(vec!["no separator"], split_top_level("no separator", " and "));
    }

    #[test]
    fn escaped_newlines_are_replaced() {
        assert_eq!(
            "Line one\nLine two",
            replace_escaped_newlines("Line one\\nLine two", "\n")
        );
        assert_eq!("A  B", replace_escaped_newlines("A\\n B", " "));
        assert_eq!("no escapes", replace_escaped_newlines("no escapes", " "));
    }

    #[test]
    fn month_names_and_abbreviations_are_case_insensitive() {
        assert_eq!("7", normalize_month("Jul"));
        assert_eq!("7", normalize_month("july"));
        assert_eq!("12", normalize_month("DECEMBER"));
        assert_eq!("5", normalize_month("may"));
    }

    #[test]
    fn unknown_month_passes_through() {
        assert_eq!("Summer", normalize_month("Summer"));
        assert_eq!("07", normalize_month("07"));
    }
}
