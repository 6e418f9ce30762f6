//! Diagnostics reported while converting records.
//!
//! The conversion functions never write logs themselves, they report to an [`Observer`] given by
//! the caller. `()` observes nothing and [`LogObserver`] forwards to the [`log`] facade.

use log::{debug, info, warn};

use crate::{ast::NameSource, Error};

/// Receiver of conversion events. Every method does nothing by default.
pub trait Observer {
    /// A record was projected into the named format.
    fn record_converted(&self, _key: &str, _format: &str) {}

    /// A record could not be converted.
    fn record_rejected(&self, _key: &str, _error: &Error) {}

    /// The author position of a record was filled from `source` because it has no authors.
    fn names_fell_back(&self, _key: &str, _source: NameSource) {}
}

impl Observer for () {}

/// An [`Observer`] writing every event to the [`log`] facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn record_converted(&self, key: &str, format: &str) {
        debug!("Converted entry '{key}' to {format}");
    }

    fn record_rejected(&self, key: &str, error: &Error) {
        warn!("Cannot convert entry '{key}': {error}");
    }

    fn names_fell_back(&self, key: &str, source: NameSource) {
        match source {
            NameSource::Author => {}
            NameSource::Editor => info!("Entry '{key}' has no authors - using its editors"),
            NameSource::Placeholder => {
                info!("Entry '{key}' has no authors or editors - using a placeholder name");
            }
        }
    }
}

#[cfg(test)]
pub(crate) use test::RecordingObserver;
