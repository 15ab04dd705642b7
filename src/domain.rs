//! DNS-style host names.
//!
//! ```abnf
//! domain = label *( "." label ) [ "." ]
//! label  = ( ALPHA / DIGIT ) *62( ALPHA / DIGIT / "-" )
//! ```

use crate::constants::{MAX_DNS_DOMAIN_LENGTH, MAX_DNS_LABEL_LENGTH};
use crate::error::ParseError;

/// A validated, lowercased domain name.
///
/// A single trailing dot (fully qualified form) is accepted and kept.
/// Internationalized names must already be in their ASCII (punycode) form.
///
/// # Examples
///
/// ```
/// use addr_canon::Domain;
///
/// let domain = Domain::parse("Sub.Example.COM.").unwrap();
/// assert_eq!(domain.as_str(), "sub.example.com.");
/// assert_eq!(domain.labels().collect::<Vec<_>>(), ["sub", "example", "com"]);
/// assert!(domain.is_fully_qualified());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    normalized: String,
}

impl Domain {
    /// Parses a domain name.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty or has an empty label other than the trailing one
    /// - A label exceeds 63 bytes or the whole name exceeds 253 bytes
    /// - A label starts with `-`
    /// - A byte other than an ASCII letter, digit, `-` or `.` is present
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::missing(0, "domain"));
        }

        let bare_len = input.strip_suffix('.').map_or(input.len(), str::len);
        if bare_len > MAX_DNS_DOMAIN_LENGTH {
            return Err(ParseError::out_of_range(
                MAX_DNS_DOMAIN_LENGTH,
                "domain",
                "must be at most 253 bytes",
            ));
        }

        let mut label_start = 0;
        let mut has_upper = false;
        for (i, c) in input.bytes().enumerate() {
            if c == b'.' {
                if i == label_start {
                    return Err(ParseError::missing(i, "domain label"));
                }
                label_start = i + 1;
                continue;
            }
            if i - label_start >= MAX_DNS_LABEL_LENGTH {
                return Err(ParseError::out_of_range(
                    i,
                    "domain label",
                    "must be at most 63 bytes",
                ));
            }
            if c.is_ascii_alphanumeric() {
                has_upper |= c.is_ascii_uppercase();
            } else if c != b'-' || i == label_start {
                return Err(ParseError::invalid_char_in(input, i, "domain"));
            }
        }

        let normalized = if has_upper {
            input.to_ascii_lowercase()
        } else {
            input.to_owned()
        };
        Ok(Self { normalized })
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns an iterator over the labels, without the trailing dot.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        let bare = self
            .normalized
            .strip_suffix('.')
            .unwrap_or(&self.normalized);
        bare.split('.')
    }

    /// Returns true if the name ends with the root dot.
    #[must_use]
    pub fn is_fully_qualified(&self) -> bool {
        self.normalized.ends_with('.')
    }

    /// Returns true for `localhost`, with or without the trailing dot.
    #[must_use]
    pub fn is_localhost(&self) -> bool {
        matches!(self.normalized.as_str(), "localhost" | "localhost.")
    }
}

canonical_string!(Domain, display);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn parse_valid_domains() {
        for input in [
            "localhost",
            "com",
            "com.",
            "42",
            "42.",
            "example.com",
            "example.com.",
            "sub.domain.example.com",
            "xn--o70b819a.example.com",
            "a-b.c-d",
        ] {
            let domain = Domain::parse(input).unwrap();
            assert_eq!(domain.as_str(), input);
        }
    }

    #[test]
    fn parse_lowercases() {
        let domain = Domain::parse("ExAmPlE.CoM").unwrap();
        assert_eq!(domain.as_str(), "example.com");
    }

    #[test]
    fn parse_empty_fails() {
        let err = Domain::parse("").unwrap_err();
        assert_eq!(err.position(), 0);
        assert!(matches!(err.kind(), ParseErrorKind::MissingComponent { .. }));
    }

    #[test]
    fn parse_empty_label_fails() {
        for (input, position) in [(".example.com", 0), ("example..com", 8), (".", 0)] {
            let err = Domain::parse(input).unwrap_err();
            assert_eq!(err.position(), position, "{input}");
            assert!(matches!(
                err.kind(),
                ParseErrorKind::MissingComponent { component: "domain label" }
            ));
        }
    }

    #[test]
    fn parse_label_too_long_fails() {
        let long = "a".repeat(64);
        let err = Domain::parse(&format!("{long}.com")).unwrap_err();
        assert_eq!(err.position(), 63);
        assert!(matches!(err.kind(), ParseErrorKind::RangeViolation { .. }));

        let max = "a".repeat(63);
        assert!(Domain::parse(&format!("{max}.com")).is_ok());
    }

    #[test]
    fn parse_domain_too_long_fails() {
        let label = "a".repeat(63);
        let name = [label.as_str(); 4].join(".");
        assert_eq!(name.len(), 255);
        let err = Domain::parse(&name).unwrap_err();
        assert!(matches!(err.kind(), ParseErrorKind::RangeViolation { .. }));
    }

    #[test]
    fn parse_hyphen_start_fails() {
        for (input, position) in [
            ("-", 0),
            ("-.", 0),
            ("-com.", 0),
            ("-example.com", 0),
            ("example.-com", 8),
            ("foo.-example.com", 4),
        ] {
            let err = Domain::parse(input).unwrap_err();
            assert_eq!(err.position(), position, "{input}");
            assert!(matches!(
                err.kind(),
                ParseErrorKind::InvalidCharacter { found: '-', .. }
            ));
        }
    }

    #[test]
    fn parse_invalid_char_fails() {
        for input in ["a_.com", "a!.com", "a#.com", "a?.com", "a/.com", "a+.com"] {
            let err = Domain::parse(input).unwrap_err();
            assert_eq!(err.position(), 1, "{input}");
            assert!(matches!(err.kind(), ParseErrorKind::InvalidCharacter { .. }));
        }
    }

    #[test]
    fn labels_skip_root() {
        let domain = Domain::parse("example.com.").unwrap();
        assert_eq!(domain.labels().collect::<Vec<_>>(), ["example", "com"]);
    }

    #[test]
    fn localhost_detection() {
        assert!(Domain::parse("LOCALHOST").unwrap().is_localhost());
        assert!(Domain::parse("localhost.").unwrap().is_localhost());
        assert!(!Domain::parse("localhost.com").unwrap().is_localhost());
    }

    #[test]
    fn ordering_follows_canonical_string() {
        let a = Domain::parse("a.com").unwrap();
        let b = Domain::parse("B.com").unwrap();
        assert!(a < b);
    }
}
