use super::{RawRecord, Record};
use crate::Error;

/// An ordered collection of validated records.
///
/// Records keep the order they were ingested in, which is also the order every output format
/// writes them in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Biblio {
    records: Vec<Record>,
}

impl Biblio {
    /// Create a new [`Biblio`] from a list of records.
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Attempts to construct every raw record and if they all succeed then returns a [`Biblio`].
    ///
    /// # Errors
    ///
    /// Returns [`Err(BiblioResolver)`] if any record fails to construct, the resolver keeps the
    /// valid records so the caller can decide to continue without the invalid ones.
    pub fn try_resolve(raw: Vec<RawRecord>) -> Result<Self, BiblioResolver> {
        BiblioResolver {
            results: raw
                .into_iter()
                .map(|raw| {
                    let key = raw.key.clone();
                    Record::try_from(raw).map_err(|err| (key, err))
                })
                .collect(),
        }
        .resolve()
    }

    /// Return a reference to a slice of records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for Biblio {
    type Item = Record;

    type IntoIter = <Vec<Record> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// A batch of constructed records where at least one raw record was invalid.
///
/// The caller decides whether an invalid record aborts the whole batch or whether the remaining
/// records are still used, see [`BiblioResolver::skip_invalid`].
#[derive(Debug)]
pub struct BiblioResolver {
    results: Vec<Result<Record, (String, Error)>>,
}

impl BiblioResolver {
    fn resolve(self) -> Result<Biblio, Self> {
        if self.results.iter().all(Result::is_ok) {
            Ok(Biblio::new(self.results.into_iter().flatten().collect()))
        } else {
            Err(self)
        }
    }

    /// Returns the citation keys and errors of the records that failed to construct, in input
    /// order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.results
            .iter()
            .filter_map(|res| res.as_ref().err())
            .map(|(key, err)| (key.as_str(), err))
    }

    /// Drops the invalid records and returns the valid ones in input order.
    #[must_use]
    pub fn skip_invalid(self) -> Biblio {
        Biblio::new(self.results.into_iter().flatten().collect())
    }
}

impl std::fmt::Display for BiblioResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, err) in self.failures() {
            writeln!(f, "{key}: {err}")?;
        }

        write!(
            f,
            "hint: consider using --skip-invalid to convert the remaining entries."
        )?;
        Ok(())
    }
}
impl std::error::Error for BiblioResolver {}
