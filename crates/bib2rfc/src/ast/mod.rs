//! Types representing bibliographic records and batches of them.
mod biblio;
mod kind;
mod record;

pub use biblio::{Biblio, BiblioResolver};
pub use kind::EntryKind;
pub use record::{NameSource, RawRecord, Record, UNKNOWN_AUTHOR};
