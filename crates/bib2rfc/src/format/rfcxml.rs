use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use super::{compose_with, Compose, Format};
use crate::{
    ast::Record,
    observer::Observer,
    text::{
        collapse_whitespace, extract_ascii, normalize_month, replace_escaped_newlines,
        transliterate,
    },
    Error,
};

/// Fields that never become a generic `<seriesInfo>`.
///
/// Either they have a dedicated place in a `<reference>` or they are only written through the
/// projection of the kinds that carry them.
const HANDLED_FIELDS: &[&str] = &[
    "title",
    "author",
    "editor",
    "year",
    "month",
    "day",
    "key",
    "journal",
    "volume",
    "number",
    "pages",
    "publisher",
    "edition",
    "isbn",
    "booktitle",
    "institution",
    "school",
    "abstract",
    "note",
];

/// Prefixes of a DOI that are already a resolver link.
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

const DOI_RESOLVER: &str = "https://doi.org/";

/// A type wrapper around [`String`] holding `<reference>` elements of the RFC XML v3 vocabulary.
#[derive(Debug)]
pub struct RfcXml(String);

impl Format for RfcXml {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "RFC XML"
    }

    fn ext() -> &'static str {
        "xml"
    }
}

impl Compose for RfcXml {
    const SEPARATOR: &'static str = "\n";

    fn compose_entry(record: &Record, observer: &dyn Observer) -> Result<String, Error> {
        compose_with::<Self>(record, observer, |record, names| {
            reference(record, names).map_err(Error::conversion)
        })
    }
}

/// Converts a single record into a `<reference>` element.
///
/// # Errors
///
/// See [`Compose::compose_entry`].
///
/// # Examples
///
/// ```
/// use bib2rfc::{ast::{EntryKind, Record}, format::to_markup};
///
/// let record = Record::new(
///     EntryKind::Misc,
///     "rfc9110",
///     [("author", "Fielding, Roy"), ("title", "HTTP Semantics"), ("year", "2022")],
/// )
/// .unwrap();
///
/// let xml = to_markup(&record).unwrap();
/// assert!(xml.contains(r#"<author fullname="Roy Fielding"/>"#));
/// assert!(xml.contains(r#"<date year="2022"/>"#));
/// ```
pub fn to_markup(record: &Record) -> Result<String, Error> {
    RfcXml::compose_entry(record, &())
}

/// The value of a field ready to be placed in markup, `None` when it is missing or blank.
fn display_text(record: &Record, field: &str) -> Option<String> {
    record
        .get_non_empty(field)
        .map(|value| collapse_whitespace(&replace_escaped_newlines(&transliterate(&value), " ")))
        .filter(|value| !value.is_empty())
}

/// ` name="ascii"` when `value` has a differing ASCII form, otherwise nothing.
fn ascii_attr(name: &str, value: &str) -> String {
    extract_ascii(value)
        .map(|ascii| format!(r#" {name}="{}""#, escape(ascii.as_str())))
        .unwrap_or_default()
}

fn doi_target(doi: &str) -> String {
    let lower = doi.to_lowercase();
    let bare = DOI_PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map_or(doi, |prefix| &doi[prefix.len()..]);
    format!("{DOI_RESOLVER}{bare}")
}

/// The `seriesInfo` name of a field that has no kind-specific label.
fn series_label(field: &str) -> String {
    let label = match field {
        "url" => "URL",
        "doi" => "DOI",
        "howpublished" => "HowPublished",
        "date-modified" => "DateModified",
        "archiveprefix" => "ArchivePrefix",
        "arxivid" => "arXivID",
        "pubmedid" => "PubMedID",
        "pmcid" => "PMCID",
        "isbn" => "ISBN",
        "issn" => "ISSN",
        "lccn" => "LCCN",
        "mrnumber" => "MRNUMBER",
        "zblnumber" => "ZBLNUMBER",
        _ => {
            let mut chars = field.chars();
            return chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            });
        }
    };
    label.to_owned()
}

/// Every `seriesInfo` of a record as `(name, value)` pairs.
///
/// The kind-specific fields come first in their fixed order, then every field outside
/// [`HANDLED_FIELDS`] in alphabetical order.
fn series_info(record: &Record) -> Vec<(String, String)> {
    let projected = record
        .kind()
        .projection().iter().filter_map(|(field, label)| {
        display_text(record, field).map(|value| ((*label).to_owned(), value))
    });

    let generic = record
        .field_names()
        .into_iter()
        .filter(|field| !HANDLED_FIELDS.contains(field))
        .filter_map(|field| {
            display_text(record, field).map(|value| (series_label(field), value))
        });

    projected.chain(generic).collect()
}

fn reference(record: &Record, names: &[String]) -> Result<String, std::fmt::Error> {
    let mut xml = String::new();

    writeln!(xml, r#"<reference anchor="{}">"#, escape(record.key()))?;
    xml.push_str("  <front>\n");

    let title = display_text(record, "title").unwrap_or_default();
    writeln!(
        xml,
        "    <title{}>{}</title>",
        ascii_attr("asciiTitle", &title),
        partial_escape(title.as_str())
    )?;

    for name in names {
        writeln!(
            xml,
            r#"    <author fullname="{}"{}/>"#,
            escape(name.as_str()),
            ascii_attr("asciiFullname", name)
        )?;
    }

    if let Some(year) = display_text(record, "year") {
        write!(xml, r#"    <date year="{}""#, escape(year.as_str()))?;
        if let Some(month) = display_text(record, "month") {
            write!(xml, r#" month="{}""#, escape(normalize_month(&month).as_str()))?;
        }
        if let Some(day) = display_text(record, "day") {
            write!(xml, r#" day="{}""#, escape(day.as_str()))?;
        }
        xml.push_str("/>\n");
    }

    if let Some(text) = display_text(record, "abstract") {
        writeln!(
            xml,
            "    <abstract{}>{}</abstract>",
            ascii_attr("asciiAbstract", &text),
            partial_escape(text.as_str())
        )?;
    }

    xml.push_str("  </front>\n");

    for (name, value) in series_info(record) {
        writeln!(
            xml,
            r#"  <seriesInfo name="{}" value="{}"{}/>"#,
            escape(name.as_str()),
            escape(value.as_str()),
            ascii_attr("asciiValue", &value)
        )?;
    }

    if let Some(url) = display_text(record, "url") {
        writeln!(xml, r#"  <format type="text" target="{}"/>"#, escape(url.as_str()))?;
    }

    if let Some(doi) = display_text(record, "doi") {
        writeln!(
            xml,
            r#"  <format type="text" target="{}"/>"#,
            escape(doi_target(&doi).as_str())
        )?;
    }

    if let Some(note) = display_text(record, "note") {
        writeln!(
            xml,
            "  <annotation{}>{}</annotation>",
            ascii_attr("asciiText", &note),
            partial_escape(note.as_str())
        )?;
    }

    xml.push_str("</reference>");
    Ok(xml)
}
