#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! # bib2rfc
//!
//! bib2rfc converts bibliographic records read from `BibTeX` into the reference formats used
//! when writing IETF documents: RFC XML v3 `<reference>` elements ([`format::RfcXml`]) and the
//! YAML references of kramdown-rfc ([`format::Kdrfc`]).
//!
//! Records are validated when they are constructed, see [`construct_record`], and every
//! conversion is a pure function of a single [`ast::Record`].
//!
//! ```
//! use bib2rfc::{construct_record, to_keyvalue, to_markup};
//!
//! let record = construct_record(
//!     "article",
//!     "smith2023",
//!     [
//!         ("author", "Alice Smith and Bob Jones"),
//!         ("title", "A Study on BibTeX Conversion"),
//!         ("journal", "Journal of Testing"),
//!         ("year", "2023"),
//!     ],
//! )
//! .unwrap();
//!
//! let xml = to_markup(&record).unwrap();
//! assert!(xml.starts_with(r#"<reference anchor="smith2023">"#));
//! assert!(xml.contains(r#"<seriesInfo name="Journal" value="Journal of Testing"/>"#));
//!
//! let yaml = to_keyvalue(&record).unwrap();
//! assert!(yaml.contains("- ins: Alice Smith"));
//! ```

pub mod ast;
mod error;
pub mod format;
pub mod observer;
pub mod text;

pub use error::{Error, ErrorKind};
pub use format::{to_keyvalue, to_markup};

use ast::{EntryKind, Record};

/// Constructs a validated [`Record`] of the kind named `kind`.
///
/// # Errors
///
/// An [`ErrorKind::InvalidInput`] error is returned when `kind` is not a known entry type, when a
/// field required by the kind is missing, or when `year` is not exactly four digits.
pub fn construct_record<F, N, V>(kind: &str, key: &str, fields: F) -> Result<Record, Error>
where
    F: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<String>,
{
    let kind: EntryKind = kind.parse()?;
    Record::new(kind, key, fields)
}
