use std::{fmt, str::FromStr};

use crate::Error;

macro_rules! entry_kinds {
    ($(
        $(#[$kind_comment:meta])*
        $kind:ident = $name:literal ($($req:literal),*)
    ),* $(,)?) => {
        /// The type of a bibliography record.
        ///
        /// The kind decides which fields a record must carry and which kind-specific fields each
        /// output format projects.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum EntryKind {
            $(
                $(#[$kind_comment])*
                $kind,
            )*
        }

        impl EntryKind {
            /// Every supported kind.
            pub const ALL: &'static [EntryKind] = &[$(Self::$kind,)*];

            /// The lower-case BibTeX name of the kind.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => $name,)*
                }
            }

            /// The fields a record of this kind must have.
            ///
            /// An `author` requirement is also satisfied by an `editor` field.
            #[must_use]
            pub const fn required_fields(self) -> &'static [&'static str] {
                match self {
                    $(Self::$kind => &[$($req,)*],)*
                }
            }
        }

        impl FromStr for EntryKind {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name => Ok(Self::$kind),)*
                    other => Err(Error::invalid_input(format!("Unknown entry type: {other}"))),
                }
            }
        }
    };
}

entry_kinds! {
    /// An article from a journal or magazine.
    Article = "article"("author", "title", "journal", "year"),
    /// A book with an explicit publisher.
    Book = "book"("author", "title", "publisher", "year"),
    /// A part of a book, such as a chapter.
    InBook = "inbook"("author", "title", "chapter", "publisher", "year"),
    /// A printed work without a named publisher.
    Booklet = "booklet"("title"),
    /// A paper in conference proceedings, the older name for `inproceedings`.
    Conference = "conference"("author", "title", "booktitle", "year"),
    /// A paper in conference proceedings.
    InProceedings = "inproceedings"("author", "title", "booktitle", "year"),
    Manual = "manual"("title"),
    MastersThesis = "mastersthesis"("author", "title", "school", "year"),
    /// Anything that does not fit another kind.
    Misc = "misc"(),
    PhdThesis = "phdthesis"("author", "title", "school", "year"),
    /// The proceedings of a conference.
    Proceedings = "proceedings"("title", "year"),
    TechReport = "techreport"("author", "title", "institution", "year"),
    Unpublished = "unpublished"("author", "title", "note"),
    /// An online resource.
    Online = "online"("title", "url"),
    Patent = "patent"("author", "title", "number"),
    Periodical = "periodical"("title", "year"),
    SuppPeriodical = "suppperiodical"("author", "title", "journal", "year"),
    /// A titled part of a book with its own title.
    InCollection = "incollection"("author", "title", "booktitle", "publisher", "year"),
    InReference = "inreference"("author", "title", "booktitle", "year"),
    Report = "report"("author", "title", "institution", "year"),
    Software = "software"("title"),
    Standard = "standard"("title", "organization"),
    /// A thesis of unspecified level.
    Thesis = "thesis"("author", "title", "school", "year"),
}

impl EntryKind {
    /// The kind-specific fields of this kind as ordered `(field, label)` pairs.
    ///
    /// The RFC XML format emits each present field as a `seriesInfo` named by the label, while the
    /// kdrfc format emits them as flat keys named by the field.
    #[must_use]
    pub const fn projection(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Article => &[
                ("journal", "Journal"),
                ("volume", "Volume"),
                ("number", "Number"),
                ("pages", "Pages"),
            ],
            Self::Book => &[
                ("publisher", "Publisher"),
                ("edition", "Edition"),
                ("isbn", "ISBN"),
            ],
            Self::Conference | Self::InProceedings | Self::Proceedings => &[
                ("booktitle", "Booktitle"),
                ("publisher", "Publisher"),
                ("pages", "Pages"),
            ],
            Self::TechReport | Self::Report => &[
                ("institution", "Institution"),
                ("number", "Report Number"),
            ],
            Self::MastersThesis | Self::PhdThesis | Self::Thesis => &[("school", "School")],
            Self::InCollection => &[("booktitle", "Booktitle"), ("publisher", "Publisher")],
            _ => &[],
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in EntryKind::ALL {
            assert_eq!(Ok(*kind), kind.name().parse::<EntryKind>().map_err(|e| e.kind()));
        }
    }

    #[test]
    fn kind_names_are_case_insensitive() {
        assert_eq!(
            EntryKind::InProceedings,
            "InProceedings".parse::<EntryKind>().unwrap()
        );
    }

    #[test]
    fn unknown_kind_is_invalid_input() {
        let err = "webpage".parse::<EntryKind>().unwrap_err();

        assert_eq!(crate::ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn misc_requires_nothing() {
        assert!(EntryKind::Misc.required_fields().is_empty());
    }

    #[test]
    fn report_number_label_is_shared_by_report_kinds() {
        for kind in [EntryKind::TechReport, EntryKind::Report] {
            assert!(kind
                .projection()
                .contains(&("number", "Report Number")));
        }
        assert!(EntryKind::Article.projection().contains(&("number", "Number")));
    }
}
