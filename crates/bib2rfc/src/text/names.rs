//! Splitting of conjoined BibTeX name lists into individual display names.

use super::{collapse_whitespace, split_top_level, strip_enclosing, transliterate};

const SEPARATOR: &str = " and ";
const NAME_PARTS: &str = ", ";

/// Splits a raw `author`/`editor` value into normalized `"First Last"` names.
///
/// The value is split on `" and "` only where that token is not nested inside grouping braces,
/// so `{Smith and Sons}` stays a single name. Each name loses one layer of enclosing braces, is
/// transliterated and is reordered from `"Last, First"` form. Empty names are dropped and the input order is kept.
///
/// # Examples
///
/// ```
/// use bib2rfc::text::parse_names;
///
/// assert_eq!(vec!["John Doe"], parse_names("Doe, John"));
/// assert_eq!(
///     vec!["Smith and Sons", "Jane Doe"],
///     parse_names("{Smith and Sons} and Jane Doe")
/// );
/// ```
#[must_use]
pub fn parse_names(raw: &str) -> Vec<String> {
    let raw = collapse_whitespace(raw);
    split_top_level(&raw, SEPARATOR)
        .into_iter()
        .filter_map(normalize_name)
        .collect()
}

/// Normalizes a list of names that has already been split, without splitting any element again.
#[must_use]
pub fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| normalize_name(&collapse_whitespace(name.as_ref())))
        .collect()
}

fn normalize_name(segment: &str) -> Option<String> {
    let segment = segment.trim();
    let segment = strip_enclosing(segment).map_or(segment, str::trim);

    let name = match split_top_level(segment, NAME_PARTS).as_slice() {
        [last, first] => format!("{} {}", transliterate(first), transliterate(last)),
        [last, suffix, first] => format!(
            "{} {} {}",
            transliterate(first),
            transliterate(last),
            transliterate(suffix)
        ),
        _ => transliterate(segment),
    };

    let name = collapse_whitespace(&name);
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_first_is_reordered() {
        assert_eq!(vec!["John Doe"], parse_names("Doe, John"));
    }

    #[test]
    fn names_are_split_in_order() {
        assert_eq!(
            vec!["John Doe", "Jane Smith"],
            parse_names("John Doe and Jane Smith")
        );
        assert_eq!(
            vec!["John Doe", "Jane Smith", "Bob Johnson"],
            parse_names("John Doe and Jane Smith and Bob Johnson")
        );
    }

    #[test]
    fn conjunction_inside_braces_is_kept() {
        assert_eq!(
            vec!["Smith and Sons", "Jane Doe"],
            parse_names("{Smith and Sons} and Jane Doe")
        );
    }

    #[test]
    fn braced_name_with_comma_is_reordered_after_unbracing() {
        assert_eq!(
            vec!["Inc. Barnes and Noble"],
            parse_names("{Barnes and Noble, Inc.}")
        );
        assert_eq!(
            vec!["Internet Engineering Task Force", "Ada Lovelace"],
            parse_names("{Internet Engineering Task Force} and {Lovelace, Ada}")
        );
    }

    #[test]
    fn names_containing_a_next_to_spaces_are_not_split() {
        assert_eq!(
            vec!["Ada a Lovelace", "Anna Andersson"],
            parse_names("Ada a Lovelace and Anna Andersson")
        );
        assert_eq!(vec!["Alexander Andrade"], parse_names("Alexander Andrade"));
    }

    #[test]
    fn accents_are_transliterated() {
        assert_eq!(
            vec!["Paul Almasan", "José Suárez-Varela"],
            parse_names(r"Paul Almasan and Jos{\'e} Su{\'a}rez{-}Varela")
        );
        assert_eq!(vec!["Kurt Gödel"], parse_names(r#"G{\"o}del, Kurt"#));
    }

    #[test]
    fn newlines_between_names_are_collapsed() {
        assert_eq!(
            vec!["Henning Schulzrinne", "Vishal Misra"],
            parse_names("Henning Schulzrinne and\n        Vishal Misra")
        );
    }

    #[test]
    fn suffix_form_is_reordered() {
        assert_eq!(vec!["Martin Luther King Jr."], parse_names("King, Jr., Martin Luther"));
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert!(parse_names("").is_empty());
        assert!(parse_names("   ").is_empty());
        assert_eq!(vec!["Jane Doe"], parse_names("{} and Jane Doe"));
    }

    #[test]
    fn pre_split_names_are_not_split_again() {
        assert_eq!(
            vec!["Smith and Sons", "John Doe"],
            normalize_names(["Smith and Sons", "Doe, John"])
        );
    }
}
