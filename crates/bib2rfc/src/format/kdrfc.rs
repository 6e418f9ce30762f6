use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::{Mapping, Number, Value};

use super::{compose_with, Compose, Format};
use crate::{
    ast::Record,
    observer::Observer,
    text::{replace_escaped_newlines, transliterate},
    Error,
};

/// Optional fields added after the kind-specific ones when a record has them.
const COMMON_FIELDS: &[&str] = &["url", "doi", "abstract", "note", "publisher"];

/// Fields written as integers when their value is all digits.
const NUMERIC_FIELDS: &[&str] = &["number", "edition"];

/// A type wrapper around [`String`] holding YAML reference entries as read by kramdown-rfc.
#[derive(Debug)]
pub struct Kdrfc(String);

impl Format for Kdrfc {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "kdrfc"
    }

    fn ext() -> &'static str {
        "yaml"
    }
}

impl Compose for Kdrfc {
    // every entry ends with a newline and is a key of the same top-level mapping
    const SEPARATOR: &'static str = "";

    fn compose_entry(record: &Record, observer: &dyn Observer) -> Result<String, Error> {
        compose_with::<Self>(record, observer, |record, names| {
            let entry = BTreeMap::from([(record.key(), Reference::new(record, names))]);
            serde_yaml::to_string(&entry).map_err(Error::conversion)
        })
    }
}

/// Converts a single record into a kdrfc YAML entry keyed by its citation key.
///
/// # Errors
///
/// See [`Compose::compose_entry`].
///
/// # Examples
///
/// ```
/// use bib2rfc::{ast::{EntryKind, Record}, format::to_keyvalue};
///
/// let record = Record::new(
///     EntryKind::Misc,
///     "rfc9110",
///     [("author", "Fielding, Roy"), ("title", "HTTP Semantics"), ("year", "2022")],
/// )
/// .unwrap();
///
/// let yaml = to_keyvalue(&record).unwrap();
/// assert!(yaml.starts_with("rfc9110:\n"));
/// assert!(yaml.contains("year: 2022"));
/// ```
pub fn to_keyvalue(record: &Record) -> Result<String, Error> {
    Kdrfc::compose_entry(record, &())
}

#[derive(Debug, Serialize)]
struct Reference {
    title: String,
    author: Vec<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<Date>,
    #[serde(flatten)]
    fields: Mapping,
}

#[derive(Debug, Serialize)]
struct Author {
    ins: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct Date {
    year: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<String>,
}

impl Reference {
    fn new(record: &Record, names: &[String]) -> Self {
        let title = record
            .get_non_empty("title")
            .map(|title| replace_escaped_newlines(&transliterate(&title), "\n"))
            .unwrap_or_default();

        let author = names
            .iter()
            .map(|name| Author {
                ins: name.clone(),
                name: name.clone(),
            })
            .collect();

        let date = text(record, "year").map(|year| Date {
            year: scalar(year, true),
            month: text(record, "month"),
        });

        let mut keys: Vec<&str> = record
            .kind()
            .projection()
            .iter()
            .map(|(field, _)| *field)
            .collect();
        for field in COMMON_FIELDS.iter().copied() {
            if !keys.contains(&field) {
                keys.push(field);
            }
        }

        let mut fields = Mapping::new();
        for field in keys {
            if let Some(value) = text(record, field) {
                fields.insert(
                    Value::from(field),
                    scalar(value, NUMERIC_FIELDS.contains(&field)),
                );
            }
        }

        Self {
            title,
            author,
            date,
            fields,
        }
    }
}

fn text(record: &Record, field: &str) -> Option<String> {
    record
        .get_non_empty(field)
        .map(|value| transliterate(&value))
}

/// An integer when `numeric` and the value is all digits, otherwise the string itself.
fn scalar(value: String, numeric: bool) -> Value {
    if numeric && value.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = value.parse::<u64>() {
            return Value::Number(Number::from(n));
        }
    }
    Value::String(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::EntryKind, ErrorKind};

    fn record(kind: EntryKind, key: &str, fields: &[(&str, &str)]) -> Record {
        Record::new(kind, key, fields.iter().copied()).expect("test record is valid")
    }

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("output is valid YAML")
    }

    #[test]
    fn article_converts_to_entry() {
        let record = record(
            EntryKind::Article,
            "smith2023",
            &[
                ("author", "Alice Smith and Bob Jones"),
                ("title", "A Study on BibTeX Conversion"),
                ("journal", "Journal of Testing"),
                ("year", "2023"),
                ("month", "jul"),
                ("volume", "42"),
            ],
        );

        let yaml = to_keyvalue(&record).unwrap();
        let doc = parse(&yaml);
        let entry = &doc["smith2023"];

        assert_eq!(Some("A Study on BibTeX Conversion"), entry["title"].as_str());
        assert_eq!(Some("Alice Smith"), entry["author"][0]["ins"].as_str());
        assert_eq!(Some("Alice Smith"), entry["author"][0]["name"].as_str());
        assert_eq!(Some("Bob Jones"), entry["author"][1]["name"].as_str());
        assert_eq!(Some(2023), entry["date"]["year"].as_u64());
        assert_eq!(Some("jul"), entry["date"]["month"].as_str());
        assert_eq!(Some("Journal of Testing"), entry["journal"].as_str());
        assert_eq!(Some("42"), entry["volume"].as_str());
    }

    #[test]
    fn blank_names_fall_back_to_unknown() {
        let record = record(
            EntryKind::Misc,
            "blank",
            &[("author", "{} and {}"), ("title", "T")],
        );

        let doc = parse(&to_keyvalue(&record).unwrap());
        let authors = doc["blank"]["author"]
            .as_sequence()
            .expect("author is a list");

        assert_eq!(1, authors.len());
        assert_eq!(Some("Unknown"), authors[0]["ins"].as_str());
        assert_eq!(Some("Unknown"), authors[0]["name"].as_str());
    }

    #[test]
    fn output_is_block_style() {
        let record = record(
            EntryKind::Misc,
            "block",
            &[("author", "A and B"), ("title", "T"), ("year", "2020")],
        );

        let yaml = to_keyvalue(&record).unwrap();

        assert!(!yaml.contains('['));
        assert!(!yaml.contains('{'));
        assert!(yaml.contains("  author:\n  - ins: A\n    name: A\n"));
    }

    #[test]
    fn report_number_and_edition_are_integers() {
        let report = record(
            EntryKind::TechReport,
            "tr",
            &[
                ("author", "A"),
                ("title", "T"),
                ("institution", "IETF"),
                ("year", "2021"),
                ("number", "14"),
            ],
        );
        let doc = parse(&to_keyvalue(&report).unwrap());
        let entry = &doc["tr"];
        assert_eq!(Some(14), entry["number"].as_u64());
        assert_eq!(Some("IETF"), entry["institution"].as_str());

        let book = record(
            EntryKind::Book,
            "book",
            &[
                ("author", "A"),
                ("title", "T"),
                ("publisher", "P"),
                ("year", "2000"),
                ("edition", "3"),
            ],
        );
        let doc = parse(&to_keyvalue(&book).unwrap());
        let entry = &doc["book"];
        assert_eq!(Some(3), entry["edition"].as_u64());
        assert_eq!(Some("P"), entry["publisher"].as_str());
    }

    #[test]
    fn non_numeric_number_stays_a_string() {
        let report = record(
            EntryKind::TechReport,
            "tr",
            &[
                ("author", "A"),
                ("title", "T"),
                ("institution", "I"),
                ("year", "2021"),
                ("number", "TR-7"),
            ],
        );

        let doc = parse(&to_keyvalue(&report).unwrap());
        let entry = &doc["tr"];
        assert_eq!(Some("TR-7"), entry["number"].as_str());
    }

    #[test]
    fn title_keeps_escaped_newlines() {
        let record = record(
            EntryKind::Misc,
            "nl",
            &[("author", "A"), ("title", r"Line one\nLine two")],
        );

        let doc = parse(&to_keyvalue(&record).unwrap());
        let entry = &doc["nl"];
        assert_eq!(Some("Line one\nLine two"), entry["title"].as_str());
    }

    #[test]
    fn common_fields_are_appended_and_accents_resolved() {
        let record = record(
            EntryKind::Misc,
            "common",
            &[
                ("author", r"Jos{\'e} Su\'arez"),
                ("title", "T"),
                ("url", "https://example.org"),
                ("doi", "10.1000/182"),
                ("note", r"Caf{\'e}"),
            ],
        );

        let doc = parse(&to_keyvalue(&record).unwrap());
        let entry = &doc["common"];
        assert_eq!(Some("José Suárez"), entry["author"][0]["name"].as_str());
        assert_eq!(Some("https://example.org"), entry["url"].as_str());
        assert_eq!(Some("10.1000/182"), entry["doi"].as_str());
        assert_eq!(Some("Café"), entry["note"].as_str());
        assert!(entry.get("date").is_none());
    }

    #[test]
    fn editors_fill_in_for_missing_authors() {
        let record = record(EntryKind::Misc, "m", &[("editor", "{IETF}"), ("title", "T")]);

        let doc = parse(&to_keyvalue(&record).unwrap());
        let entry = &doc["m"];
        assert_eq!(Some("IETF"), entry["author"][0]["name"].as_str());
    }

    #[test]
    fn entries_concatenate_into_one_mapping() {
        let biblio = crate::ast::Biblio::new(vec![
            record(EntryKind::Misc, "one", &[("author", "A"), ("title", "First")]),
            record(EntryKind::Misc, "two:colon", &[("author", "B"), ("title", "Second")]),
        ]);

        let yaml = Kdrfc::compose(&biblio, &()).unwrap().raw();
        let doc = parse(&yaml);

        assert_eq!(Some("First"), doc["one"]["title"].as_str());
        assert_eq!(Some("Second"), doc["two:colon"]["title"].as_str());
    }

    #[test]
    fn missing_title_is_invalid_input() {
        let record = record(EntryKind::Misc, "m", &[("author", "A")]);

        assert_eq!(
            ErrorKind::InvalidInput,
            to_keyvalue(&record).unwrap_err().kind()
        );
    }
}
