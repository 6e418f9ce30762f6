use std::collections::HashMap;

use biblatex::{Bibliography, Chunk, Chunks};
use log::{trace, warn};

use super::{Format, Parse};
use crate::{
    ast::{EntryKind, RawRecord},
    Error, ErrorKind,
};

/// A type wrapper around [`String`] to represent a `BibTeX` format string.
#[derive(Debug)]
pub struct BibTex(String);

impl Format for BibTex {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "BibTeX"
    }

    fn ext() -> &'static str {
        "bib"
    }
}

impl Parse for BibTex {
    /// Parses every entry into a [`RawRecord`], keeping the order of the input.
    ///
    /// Blank input holds zero records. Entry types that are not known are read as `misc`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Deserialize`] error when the input is not blank but contains no
    /// entry that can be parsed.
    fn parse(self) -> Result<Vec<RawRecord>, Error> {
        if self.0.trim().is_empty() {
            return Ok(Vec::new());
        }

        let bibliography = Bibliography::parse(&self.0)
            .filter(|b| b.len() != 0)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Deserialize,
                    "No valid BibTeX entries found in input",
                )
            })?;

        trace!("Parsed {} BibTeX entries", bibliography.len());
        Ok(bibliography.into_iter().map(RawRecord::from).collect())
    }
}

/// Lower-cases the entry type and maps it onto a known kind, `misc` when there is none.
fn normalize_kind(key: &str, entry_type: &str) -> String {
    let kind = match entry_type.to_lowercase().as_str() {
        "inproceeding" => "inproceedings".to_owned(),
        other => other.to_owned(),
    };

    if kind.parse::<EntryKind>().is_ok() {
        kind
    } else {
        warn!("Entry '{key}' has unknown type '{entry_type}' - reading it as misc");
        EntryKind::Misc.name().to_owned()
    }
}

impl From<biblatex::Entry> for RawRecord {
    fn from(entry: biblatex::Entry) -> Self {
        // Deconstruct to avoid cloning
        let biblatex::Entry {
            key,
            entry_type,
            mut fields,
        } = entry;

        let kind = normalize_kind(&key, &entry_type.to_string());
        trace!("Reading entry '{key}' as {kind}");

        let fields: HashMap<String, String> = fields
            .drain()
            .map(|(name, chunks)| (name.to_lowercase(), raw_value(chunks)))
            .collect();

        Self { kind, key, fields }
    }
}

/// Rebuilds the source text of a field, verbatim chunks go back inside grouping braces.
fn raw_value(chunks: Chunks) -> String {
    // Check last character for an escape and if found then start merging using `merge_escaped`
    fn verbatim_chunk_merge(verbatim_str: &mut String, chunks: &mut impl Iterator<Item = Chunk>) {
        if verbatim_str.ends_with('/') {
            merge_escaped(verbatim_str, chunks);
        }
    }

    // biblatex reads a '/' inside a verbatim chunk as an escape, which splits something like
    // "{(HTTP/1.1)}" into [Verbatim("(HTTP/"), Normal("1"), Verbatim("."), Normal("1"),
    // Verbatim(")")]. Everything up to and including the verbatim chunk after the second normal
    // chunk belongs to the first verbatim chunk.
    fn merge_escaped(dest: &mut String, chunks: &mut impl Iterator<Item = Chunk>) {
        let mut normal_count = 0;
        while let Some(chunk) = chunks.next() {
            match chunk {
                Chunk::Normal(s) => {
                    normal_count += 1;
                    dest.push_str(&s);
                }
                Chunk::Verbatim(mut s) => {
                    verbatim_chunk_merge(&mut s, chunks);
                    dest.push_str(&s);
                    if normal_count == 2 {
                        return;
                    }
                }
            }
        }
    }

    let mut value = String::new();

    let mut chunk_iter = chunks.into_iter();
    while let Some(chunk) = chunk_iter.next() {
        match chunk {
            Chunk::Verbatim(mut s) => {
                verbatim_chunk_merge(&mut s, &mut chunk_iter);
                value.push('{');
                value.push_str(&s);
                value.push('}');
            }
            Chunk::Normal(s) => value.push_str(&s),
        }
    }

    value
}
