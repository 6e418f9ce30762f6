//! Contains traits and implementions of the [`Format`], [`Parse`], [`Compose`], [`Reader`], and
//! [`Writer`] traits.
//!
//! [`BibTex`] is the only format records are read from, [`RfcXml`] and [`Kdrfc`] are the formats
//! records are converted to.
use std::marker::PhantomData;

mod bibtex;
mod kdrfc;
mod rfcxml;

use crate::{
    ast::{Biblio, BiblioResolver, NameSource, RawRecord, Record},
    observer::Observer,
    Error, ErrorKind,
};
pub use bibtex::BibTex;
pub use kdrfc::{to_keyvalue, Kdrfc};
pub use rfcxml::{to_markup, RfcXml};

/// A textual representation of bibliographic records.
///
/// Formats are promises at the type level about what a [`String`] (or similar) represents.
pub trait Format {
    /// Construct a new type using a [`String`] input.
    ///
    /// This function should not panic or fail as creating a [`Format`] is a type promise about
    /// what the [`String`] represents.
    fn new(val: String) -> Self;

    /// The current [`Format`] in a raw [`String`].
    fn raw(self) -> String;

    /// The display name of the format.
    fn name() -> &'static str;

    /// The file extension associated with this format.
    fn ext() -> &'static str;
}

/// A [`Format`] that records can be read from.
pub trait Parse: Format + Sized {
    /// Parses this [`Format`] into raw records in the order they appear.
    ///
    /// # Errors
    ///
    /// Will return [`Err`] if the text is not valid for this format.
    fn parse(self) -> Result<Vec<RawRecord>, Error>;

    /// Parses this [`Format`] and constructs a [`Record`] from every raw record.
    ///
    /// # Errors
    ///
    /// Will return [`Err`] if the text is not valid for this format. The inner [`Err`] holds the
    /// records that were valid alongside the ones that were not.
    fn parse_biblio(self) -> Result<Result<Biblio, BiblioResolver>, Error> {
        self.parse().map(Biblio::try_resolve)
    }
}

/// A [`Format`] that records can be converted to.
pub trait Compose: Format + Sized {
    /// Text placed between two converted records.
    const SEPARATOR: &'static str;

    /// Converts a single record to a [`String`] of this format.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidInput`][crate::ErrorKind::InvalidInput] error, before any
    /// output is built, when the record lacks an author or editor or a title. Any other failure is
    /// returned as an [`ErrorKind::Conversion`][crate::ErrorKind::Conversion] error wrapping the
    /// cause.
    fn compose_entry(record: &Record, observer: &dyn Observer) -> Result<String, Error>;

    /// Converts every record of the [`Biblio`] in order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first record that fails to convert.
    fn compose(biblio: &Biblio, observer: &dyn Observer) -> Result<Self, Error> {
        compose_records(biblio, observer, false).map(|(format, _)| format)
    }

    /// Converts every record of the [`Biblio`] in order, leaving out the records that lack an
    /// author or editor or a title. The count is the number of records that were converted.
    ///
    /// Left out records are still reported to the `observer` as rejected.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not an
    /// [`ErrorKind::InvalidInput`][crate::ErrorKind::InvalidInput] error.
    fn compose_valid(biblio: &Biblio, observer: &dyn Observer) -> Result<(Self, usize), Error> {
        compose_records(biblio, observer, true)
    }
}

fn compose_records<F: Compose>(
    biblio: &Biblio,
    observer: &dyn Observer,
    skip_invalid: bool,
) -> Result<(F, usize), Error> {
    let mut entries = Vec::with_capacity(biblio.len());

    for record in biblio.records() {
        match F::compose_entry(record, observer) {
            Ok(entry) => entries.push(entry),
            Err(err) if skip_invalid && err.kind() == ErrorKind::InvalidInput => {}
            Err(err) => return Err(err),
        }
    }

    let count = entries.len();
    Ok((F::new(entries.join(F::SEPARATOR)), count))
}

/// Runs the checks and observer reporting shared by every [`Compose`] implementation around
/// `build`, which gets the record and the names for the author position.
fn compose_with<F>(
    record: &Record,
    observer: &dyn Observer,
    build: impl FnOnce(&Record, &[String]) -> Result<String, Error>,
) -> Result<String, Error>
where
    F: Compose,
{
    let result = record.check_convertible().and_then(|()| {
        let (names, source) = record.display_names();
        if source != NameSource::Author {
            observer.names_fell_back(record.key(), source);
        }
        build(record, &names)
    });

    match &result {
        Ok(_) => observer.record_converted(record.key(), F::name()),
        Err(err) => observer.record_rejected(record.key(), err),
    }
    result
}

/// A trait for objects which are [`Format`]-oriented sinks.
pub trait Writer {
    /// The format associated with the writer.
    type Format: Compose;

    /// Write a format into this writer.
    ///
    /// # Errors
    ///
    /// The call to write should only return an [`Err`] when writing to the writer cannot be
    /// completed.
    fn write(&mut self, format: Self::Format) -> Result<(), Error>;
}

/// The [`Reader`] trait allows for reading a [`Format`] from a source.
pub trait Reader {
    /// The format associated with the reader.
    type Format: Parse;

    /// Pull some bytes from this reader in order to produce a [`Reader::Format`] instance.
    ///
    /// # Errors
    /// If this method encounters any form of error making it unable to read the bytes in order to
    /// create the format.
    fn read(&mut self) -> Result<Self::Format, Error>;

    /// Read bytes from this reader using [`Reader::read`] and then parse using
    /// [`Parse::parse_biblio`] with the associated [`Reader::Format`] type.
    ///
    /// # Errors
    /// This will return [`Err`] if there is an error from [`Reader::read`] or an error when parsing
    /// using [`Parse::parse`].
    fn read_biblio(&mut self) -> Result<Result<Biblio, BiblioResolver>, Error> {
        let format = self.read()?;
        format.parse_biblio()
    }
}

/// A [`String`] wrapper that includes type information of the format the wrapped [`String`]
/// represents.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, PartialEq, Eq)]
pub struct FormatString<F: Format> {
    inner: String,
    _format: PhantomData<F>,
}

impl<F: Format> Default for FormatString<F> {
    fn default() -> Self {
        Self {
            inner: String::default(),
            _format: PhantomData,
        }
    }
}

impl<F: Format> FormatString<F> {
    /// Construct a new instance by wrapping an existing [`String`].
    #[must_use]
    pub const fn new(val: String) -> Self {
        Self {
            inner: val,
            _format: PhantomData,
        }
    }
}

impl<F: Format> From<FormatString<F>> for String {
    fn from(val: FormatString<F>) -> Self {
        val.inner
    }
}

impl<F: Parse> Reader for FormatString<F> {
    type Format = F;

    fn read(&mut self) -> Result<Self::Format, Error> {
        Ok(F::new(self.inner.clone()))
    }
}

impl<F: Compose> Writer for FormatString<F> {
    type Format = F;

    fn write(&mut self, format: F) -> Result<(), Error> {
        self.inner.push_str(&format.raw());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::EntryKind, observer::RecordingObserver};

    const TWO_ARTICLES: &str = r#"
@article{first, author = {Alice Smith}, title = {First}, journal = {J}, year = {2020}}
@article{second, author = {Bob Jones}, title = {Second}, journal = {J}, year = {2021}}
"#;

    #[test]
    fn bibtex_string_converts_to_xml_in_order() {
        let mut reader = FormatString::<BibTex>::new(TWO_ARTICLES.to_owned());
        let biblio = reader
            .read_biblio()
            .expect("valid BibTeX")
            .expect("both articles are complete");

        let mut writer = FormatString::<RfcXml>::default();
        writer.write(RfcXml::compose(&biblio, &()).unwrap()).unwrap();
        let xml = String::from(writer);

        let first = xml.find(r#"<reference anchor="first">"#).expect("first reference");
        let second = xml.find(r#"<reference anchor="second">"#).expect("second reference");
        assert!(first < second);
    }

    #[test]
    fn compose_stops_at_first_invalid_record() {
        let biblio = Biblio::new(vec![
            Record::new(
                EntryKind::Misc,
                "ok",
                [("author", "A"), ("title", "T")],
            )
            .unwrap(),
            Record::new(EntryKind::Misc, "untitled", [("author", "A")]).unwrap(),
        ]);

        let observer = RecordingObserver::default();
        let err = Kdrfc::compose(&biblio, &observer).unwrap_err();

        assert_eq!(ErrorKind::InvalidInput, err.kind());
        assert_eq!(
            vec!["converted ok kdrfc", "rejected untitled"],
            *observer.events.borrow()
        );
    }

    #[test]
    fn compose_valid_leaves_out_unconvertible_records() {
        let biblio = Biblio::new(vec![
            Record::new(EntryKind::Misc, "untitled", [("author", "A")]).unwrap(),
            Record::new(EntryKind::Misc, "first", [("author", "A"), ("title", "One")]).unwrap(),
            Record::new(EntryKind::Misc, "anonymous", [("title", "T")]).unwrap(),
            Record::new(EntryKind::Misc, "second", [("author", "B"), ("title", "Two")]).unwrap(),
        ]);

        let observer = RecordingObserver::default();
        let (xml, count) = RfcXml::compose_valid(&biblio, &observer).unwrap();
        let xml = xml.raw();

        assert_eq!(2, count);
        assert!(!xml.contains("untitled") && !xml.contains("anonymous"));
        let first = xml.find(r#"anchor="first""#).expect("first reference");
        let second = xml.find(r#"anchor="second""#).expect("second reference");
        assert!(first < second);
        assert_eq!(
            vec![
                "rejected untitled",
                "converted first RFC XML",
                "rejected anonymous",
                "converted second RFC XML"
            ],
            *observer.events.borrow()
        );
    }

    #[test]
    fn compose_valid_of_empty_biblio_is_empty() {
        let (yaml, count) = Kdrfc::compose_valid(&Biblio::default(), &()).unwrap();

        assert_eq!(0, count);
        assert_eq!("", yaml.raw());
    }

    #[test]
    fn fallback_is_reported_to_the_observer() {
        let record = Record::new(
            EntryKind::Misc,
            "edited",
            [("editor", "Eve Editor"), ("title", "T")],
        )
        .unwrap();

        let observer = RecordingObserver::default();
        RfcXml::compose_entry(&record, &observer).unwrap();

        assert_eq!(
            vec!["fallback edited Editor", "converted edited RFC XML"],
            *observer.events.borrow()
        );
    }
}
