//! Error types for address parsing.
//!
//! Every failure carries the byte offset of the first offending byte in
//! the top-level input. Parsers that delegate to a sub-grammar shift the
//! sub-parser's error with [`ParseError::offset_by`] so the position stays
//! relative to what the caller passed in.

use std::error::Error;
use std::fmt;

/// A positioned parse failure.
///
/// # Examples
///
/// ```
/// use addr_canon::{Domain, ParseErrorKind};
///
/// let err = Domain::parse("-example.com").unwrap_err();
/// assert_eq!(err.position(), 0);
/// assert!(matches!(err.kind(), ParseErrorKind::InvalidCharacter { found: '-', .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    position: usize,
    kind: ParseErrorKind,
    cause: Option<Box<ParseError>>,
}

/// Specific parsing error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A required component is absent or empty
    MissingComponent {
        /// Name of the missing component
        component: &'static str,
    },
    /// A byte the grammar does not allow at this position
    InvalidCharacter {
        /// The offending character
        found: char,
        /// The component being parsed
        component: &'static str,
    },
    /// Malformed percent-encoded sequence
    InvalidEncoding,
    /// A numeric value or length is out of bounds
    RangeViolation {
        /// The component being parsed
        component: &'static str,
        /// What bound was violated
        reason: &'static str,
    },
    /// The input's shape breaks a structural rule of the grammar, or two
    /// components contradict each other
    StructuralConflict {
        /// What rule was broken
        reason: &'static str,
    },
}

impl ParseError {
    /// Creates an error at the given byte offset.
    #[must_use]
    pub const fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self {
            position,
            kind,
            cause: None,
        }
    }

    pub(crate) const fn missing(position: usize, component: &'static str) -> Self {
        Self::new(position, ParseErrorKind::MissingComponent { component })
    }

    pub(crate) const fn invalid_char(
        position: usize,
        found: char,
        component: &'static str,
    ) -> Self {
        Self::new(position, ParseErrorKind::InvalidCharacter { found, component })
    }

    pub(crate) const fn out_of_range(
        position: usize,
        component: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::new(position, ParseErrorKind::RangeViolation { component, reason })
    }

    pub(crate) const fn conflict(position: usize, reason: &'static str) -> Self {
        Self::new(position, ParseErrorKind::StructuralConflict { reason })
    }

    /// Reports an invalid character found at `position` in `input`.
    pub(crate) fn invalid_char_in(input: &str, position: usize, component: &'static str) -> Self {
        let found = input[position..].chars().next().unwrap_or('\0');
        Self::invalid_char(position, found, component)
    }

    /// Attaches the sub-grammar failure that explains this error.
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns the same error shifted `offset` bytes to the right.
    ///
    /// The whole cause chain is shifted as well.
    #[must_use]
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        if let Some(cause) = self.cause.take() {
            self.cause = Some(Box::new(cause.offset_by(offset)));
        }
        self
    }

    /// Moves the error to `position`, for grammars that report an index
    /// rather than a byte offset.
    #[must_use]
    pub(crate) fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Undoes the shift caused by text prepended to the caller's input.
    ///
    /// Positions inside the prepended text clamp to 0.
    pub(crate) fn before_prefix(mut self, prefix_len: usize) -> Self {
        self.position = self.position.saturating_sub(prefix_len);
        if let Some(cause) = self.cause.take() {
            self.cause = Some(Box::new(cause.before_prefix(prefix_len)));
        }
        self
    }

    /// Returns the byte offset of the first offending byte.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the kind of failure.
    #[must_use]
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns the wrapped sub-grammar failure, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent { component } => write!(f, "missing {component}"),
            Self::InvalidCharacter { found, component } => {
                write!(f, "invalid character {found:?} in {component}")
            }
            Self::InvalidEncoding => write!(f, "invalid percent-encoding"),
            Self::RangeViolation { component, reason } => write!(f, "{component} {reason}"),
            Self::StructuralConflict { reason } => write!(f, "{reason}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.position, self.kind)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::missing(3, "host");
        assert_eq!(err.to_string(), "[3]: missing host");
    }

    #[test]
    fn display_includes_cause() {
        let err = ParseError::conflict(0, "invalid IPv4-mapped IPv6 address")
            .with_cause(ParseError::conflict(9, "leading zeros not allowed"));
        assert_eq!(
            err.to_string(),
            "[0]: invalid IPv4-mapped IPv6 address: [9]: leading zeros not allowed"
        );
    }

    #[test]
    fn offset_by_shifts_cause_chain() {
        let err = ParseError::conflict(1, "outer")
            .with_cause(ParseError::invalid_char(2, 'x', "inner"))
            .offset_by(10);
        assert_eq!(err.position(), 11);
        assert_eq!(err.cause().map(ParseError::position), Some(12));
    }

    #[test]
    fn before_prefix_clamps_at_zero() {
        let err = ParseError::conflict(8, "outer")
            .with_cause(ParseError::missing(3, "inner"))
            .before_prefix(5);
        assert_eq!(err.position(), 3);
        assert_eq!(err.cause().map(ParseError::position), Some(0));
    }

    #[test]
    fn source_exposes_cause() {
        let err = ParseError::conflict(0, "outer").with_cause(ParseError::missing(0, "port"));
        assert!(err.source().is_some());
        assert!(ParseError::missing(0, "port").source().is_none());
    }

    #[test]
    fn invalid_char_in_reads_multibyte() {
        let err = ParseError::invalid_char_in("ab\u{e9}", 2, "domain");
        assert!(matches!(
            err.kind(),
            ParseErrorKind::InvalidCharacter { found: '\u{e9}', .. }
        ));
    }
}
