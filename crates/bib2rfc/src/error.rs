pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when constructing, reading, or converting records.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A record is missing required fields or has a malformed field value.
    InvalidInput,
    /// An unexpected failure while projecting a record into an output format.
    Conversion,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// The error is associated with an underlying IO error.
    IO,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Shorthand for an [`ErrorKind::InvalidInput`] error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Wraps the cause of a failed conversion.
    pub fn conversion<E>(source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self::wrap(ErrorKind::Conversion, source)
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message describing the error, if one was given.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidInput => f.write_str("Invalid input")?,
            ErrorKind::Conversion => f.write_str("Conversion failed")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::IO => f.write_str("IO error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_keeps_the_cause() {
        let err = Error::conversion(std::fmt::Error);

        assert_eq!(ErrorKind::Conversion, err.kind());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            "Conversion failed: caused by an error occurred when formatting an argument",
            err.to_string()
        );
    }

    #[test]
    fn invalid_input_displays_message() {
        let err = Error::invalid_input("Invalid year format: 23");

        assert_eq!(ErrorKind::InvalidInput, err.kind());
        assert_eq!(Some("Invalid year format: 23"), err.message());
        assert_eq!("Invalid input: Invalid year format: 23", err.to_string());
    }
}
