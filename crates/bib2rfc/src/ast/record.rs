use std::collections::HashMap;

use super::EntryKind;
use crate::{
    text::{self, parse_names},
    Error,
};

/// Name used in the author position when a record has neither authors nor editors.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A record as handed over by ingestion, before any validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Lower-case entry type tag, e.g. `article`.
    pub kind: String,
    /// Citation key.
    pub key: String,
    /// Field names mapped to their raw values.
    pub fields: HashMap<String, String>,
}

/// A validated bibliographic record.
///
/// Field values are stored exactly as ingested, with grouping braces and accent escapes still in
/// place. Every read through [`Record::get`] produces a normalized copy so the stored values stay
/// available for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    kind: EntryKind,
    key: String,
    fields: HashMap<String, String>,
}

/// Where the names in the author position of an output came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameSource {
    /// The `author` field.
    Author,
    /// The `editor` field, used because the record has no authors.
    Editor,
    /// The [`UNKNOWN_AUTHOR`] placeholder.
    Placeholder,
}

impl Record {
    /// Constructs a record after checking the required fields of `kind` and the `year` format.
    ///
    /// Field names are lower-cased, values are kept as they are.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::InvalidInput`][crate::ErrorKind::InvalidInput] error is returned when a
    /// required field is missing, naming every missing field in sorted order, or when `year` is
    /// not exactly four digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use bib2rfc::ast::{EntryKind, Record};
    ///
    /// let fields = HashMap::from([("author".to_owned(), "A".to_owned())]);
    /// let err = Record::new(EntryKind::Article, "key", fields).unwrap_err();
    ///
    /// assert!(err.to_string().contains("journal, title, year"));
    /// ```
    pub fn new<K, F, N, V>(kind: EntryKind, key: K, fields: F) -> Result<Self, Error>
    where
        K: Into<String>,
        F: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let record = Self {
            kind,
            key: key.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.as_ref().to_lowercase(), value.into()))
                .collect(),
        };
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> Result<(), Error> {
        let mut missing: Vec<&str> = self
            .kind
            .required_fields()
            .iter()
            .copied()
            .filter(|name| match *name {
                "author" => !self.has("author") && !self.has("editor"),
                name => !self.has(name),
            })
            .collect();

        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(Error::invalid_input(format!(
                "Missing required fields for {}: {}",
                self.kind,
                missing.join(", ")
            )));
        }

        if let Some(year) = self.get("year") {
            if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::invalid_input(format!(
                    "Invalid year format: {year}"
                )));
            }
        }

        Ok(())
    }

    /// The kind of the record.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// The citation key of the record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value of the field with up to two layers of enclosing braces stripped and
    /// newlines collapsed, or `None` when the record has no such field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.get_raw(name).map(text::normalize_field)
    }

    /// Returns the value of the field exactly as it was ingested.
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns the normalized value of the field when it is present and not blank.
    #[must_use]
    pub fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Returns `true` when the record has the field.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    /// The names of every field of the record in sorted order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The authors of the record, empty when there is no `author` field.
    #[must_use]
    pub fn authors(&self) -> Vec<String> {
        self.get_raw("author").map(parse_names).unwrap_or_default()
    }

    /// The editors of the record, empty when there is no `editor` field.
    #[must_use]
    pub fn editors(&self) -> Vec<String> {
        self.get_raw("editor").map(parse_names).unwrap_or_default()
    }

    /// The names to show in the author position of an output.
    ///
    /// Editors are used only when there are no authors at all, and the single name
    /// [`UNKNOWN_AUTHOR`] when there are neither.
    #[must_use]
    pub fn display_names(&self) -> (Vec<String>, NameSource) {
        let authors = self.authors();
        if !authors.is_empty() {
            return (authors, NameSource::Author);
        }

        let editors = self.editors();
        if !editors.is_empty() {
            return (editors, NameSource::Editor);
        }

        (vec![UNKNOWN_AUTHOR.to_owned()], NameSource::Placeholder)
    }

    /// Checks that the record can be converted to an output format, which needs an author or
    /// editor and a title.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidInput`][crate::ErrorKind::InvalidInput] error when the
    /// record has neither an author nor an editor, or has no title.
    pub fn check_convertible(&self) -> Result<(), Error> {
        let has_person =
            self.get_non_empty("author").is_some() || self.get_non_empty("editor").is_some();

        if has_person && self.get_non_empty("title").is_some() {
            Ok(())
        } else {
            Err(Error::invalid_input(format!(
                "Missing required fields for '{}': author or editor, and title",
                self.key
            )))
        }
    }
}

impl TryFrom<RawRecord> for Record {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let kind = raw.kind.parse()?;
        Self::new(kind, raw.key, raw.fields)
    }
}
