//! Authority component: `[userinfo@]host[:port]`.
//!
//! # Grammar Reference
//!
//! ```abnf
//! authority = [ userinfo "@" ] ( host [ ":" port ] / ":" port )
//! host      = "[" IPv6 "]" / IPv4 / domain
//! port      = 1*DIGIT
//! ```
//!
//! The host may be omitted when a port is given (`:80`), which local
//! addresses use to mean "all interfaces".

use std::fmt;

use crate::char_class::{is_userinfo_char, normalize};
use crate::constants::PASSWORD_MASK;
use crate::error::ParseError;
use crate::host::Host;

/// Smallest bracketed IPv6 literal, `[::]`.
const MIN_IPV6_LITERAL_LEN: usize = 4;

/// A validated authority.
///
/// `as_str()` returns the canonical form; `Display` masks the password.
///
/// # Examples
///
/// ```
/// use addr_canon::Authority;
///
/// let authority = Authority::parse("user:secret@Example.com:0080").unwrap();
/// assert_eq!(authority.as_str(), "user:secret@example.com:80");
/// assert_eq!(authority.to_string(), "user:****@example.com:80");
/// assert_eq!(authority.username(), Some("user"));
/// assert_eq!(authority.port(), Some(80));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    userinfo: Option<String>,
    host: Option<Host>,
    port: Option<u16>,
    normalized: String,
}

impl Authority {
    /// Parses an authority.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The host and port are both missing
    /// - The userinfo has an invalid character or percent-encoding
    /// - A bracketed IPv6 literal is unterminated or malformed
    /// - The host is not a valid IPv4 address or domain name
    /// - A port separator is present with an empty, non-decimal or
    ///   out-of-range port
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (userinfo, host_port, offset) = match input.find('@') {
            Some(at) => {
                let userinfo = normalize(&input[..at], is_userinfo_char, "userinfo")?;
                (Some(userinfo), &input[at + 1..], at + 1)
            }
            None => (None, input, 0),
        };

        let (host, port) = parse_host_port(host_port).map_err(|e| e.offset_by(offset))?;
        Ok(Self::from_parts(userinfo.filter(|u| !u.is_empty()), host, port))
    }

    pub(crate) fn from_parts(
        userinfo: Option<String>,
        host: Option<Host>,
        port: Option<u16>,
    ) -> Self {
        let normalized = format!(
            "{}{}{}",
            userinfo.as_deref().map(|u| format!("{u}@")).unwrap_or_default(),
            host.as_ref().map(ToString::to_string).unwrap_or_default(),
            port.map(|p| format!(":{p}")).unwrap_or_default(),
        );
        Self {
            userinfo,
            host,
            port,
            normalized,
        }
    }

    /// Returns the canonical string, password included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the percent-normalized userinfo, if present.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    /// Returns the userinfo up to the first `:`.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.userinfo
            .as_deref()
            .map(|u| u.split_once(':').map_or(u, |(user, _)| user))
    }

    /// Returns the userinfo after the first `:`, if there is one.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.userinfo
            .as_deref()
            .and_then(|u| u.split_once(':'))
            .map(|(_, password)| password)
    }

    /// Returns the host; `None` for a port-only authority.
    #[must_use]
    pub const fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    /// Returns the port, if present.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the `host[:port]` part of the canonical string.
    #[must_use]
    pub fn host_port(&self) -> &str {
        match &self.userinfo {
            Some(u) => &self.normalized[u.len() + 1..],
            None => &self.normalized,
        }
    }

    /// Returns a new authority with the given userinfo. An empty string
    /// removes it.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the userinfo has an invalid character or
    /// percent-encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Authority;
    ///
    /// let authority = Authority::parse("user@host").unwrap();
    /// assert_eq!(authority.with_userinfo("admin").unwrap().as_str(), "admin@host");
    /// ```
    pub fn with_userinfo(&self, userinfo: &str) -> Result<Self, ParseError> {
        let userinfo = normalize(userinfo, is_userinfo_char, "userinfo")?;
        Ok(Self::from_parts(
            Some(userinfo).filter(|u| !u.is_empty()),
            self.host.clone(),
            self.port,
        ))
    }

    /// Returns a new authority without userinfo.
    #[must_use]
    pub fn without_userinfo(&self) -> Self {
        Self::from_parts(None, self.host.clone(), self.port)
    }

    /// Returns a new authority with the given host.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the host is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Authority;
    ///
    /// let authority = Authority::parse("user:pass@host:80").unwrap();
    /// let moved = authority.with_host("example.com").unwrap();
    /// assert_eq!(moved.as_str(), "user:pass@example.com:80");
    /// ```
    pub fn with_host(&self, host: &str) -> Result<Self, ParseError> {
        let host = Host::parse(host)?;
        Ok(Self::from_parts(self.userinfo.clone(), Some(host), self.port))
    }

    /// Returns a new authority with the given port.
    #[must_use]
    pub fn with_port(&self, port: u16) -> Self {
        Self::from_parts(self.userinfo.clone(), self.host.clone(), Some(port))
    }

    /// Returns a new authority without a port.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the authority has no host, since removing
    /// the port would leave it empty.
    pub fn without_port(&self) -> Result<Self, ParseError> {
        if self.host.is_none() {
            return Err(ParseError::missing(0, "host"));
        }
        Ok(Self::from_parts(
            self.userinfo.clone(),
            self.host.clone(),
            None,
        ))
    }

    /// Returns a new authority with the port removed when it equals
    /// `default`.
    pub(crate) fn eliding_port(&self, default: u16) -> Self {
        if self.port == Some(default) && self.host.is_some() {
            tracing::trace!(authority = %self, port = default, "eliding default port");
            Self::from_parts(self.userinfo.clone(), self.host.clone(), None)
        } else {
            self.clone()
        }
    }
}

/// Parses `host[:port]`, `[ipv6][:port]` or `:port`.
fn parse_host_port(s: &str) -> Result<(Option<Host>, Option<u16>), ParseError> {
    if s.is_empty() {
        return Err(ParseError::missing(0, "host"));
    }

    let (host, port) = if s.starts_with('[') {
        let close = s
            .find(']')
            .filter(|&i| i + 1 >= MIN_IPV6_LITERAL_LEN)
            .ok_or_else(|| ParseError::conflict(0, "invalid IPv6 literal"))?;
        match s.as_bytes().get(close + 1) {
            None => (s, None),
            Some(b':') => (&s[..=close], Some(close + 2)),
            Some(_) => return Err(ParseError::invalid_char_in(s, close + 1, "authority")),
        }
    } else {
        match s.rfind(':') {
            Some(colon) => (&s[..colon], Some(colon + 1)),
            None => (s, None),
        }
    };

    let host = if host.is_empty() {
        None
    } else {
        Some(Host::parse(host)?)
    };
    let port = port
        .map(|at| parse_port(&s[at..]).map_err(|e| e.offset_by(at)))
        .transpose()?;
    Ok((host, port))
}

/// Parses a decimal port, stripping leading zeros.
pub(crate) fn parse_port(s: &str) -> Result<u16, ParseError> {
    if s.is_empty() {
        return Err(ParseError::missing(0, "port"));
    }
    if let Some(i) = s.bytes().position(|c| !c.is_ascii_digit()) {
        return Err(ParseError::invalid_char_in(s, i, "port"));
    }
    let digits = s.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u16>()
        .map_err(|_| ParseError::out_of_range(0, "port", "must be between 0 and 65535"))
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.userinfo.as_deref().and_then(|u| u.split_once(':')) {
            Some((user, _)) => write!(f, "{user}:{PASSWORD_MASK}@{}", self.host_port()),
            None => f.write_str(&self.normalized),
        }
    }
}

canonical_string!(Authority);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn parse_components() {
        for (input, normalized, userinfo, host, port) in [
            ("127.0.0.1", "127.0.0.1", None, Some("127.0.0.1"), None),
            ("[::1]", "[::1]", None, Some("[::1]"), None),
            ("host", "host", None, Some("host"), None),
            ("@host", "host", None, Some("host"), None),
            (":80", ":80", None, None, Some(80)),
            ("user:pass@host", "user:pass@host", Some("user:pass"), Some("host"), None),
            ("0.0.0.0:80", "0.0.0.0:80", None, Some("0.0.0.0"), Some(80)),
            ("[::]:80", "[::]:80", None, Some("[::]"), Some(80)),
            ("host:80", "host:80", None, Some("host"), Some(80)),
            ("@host:80", "host:80", None, Some("host"), Some(80)),
            ("user@:80", "user@:80", Some("user"), None, Some(80)),
            (
                "user:pass@host:80",
                "user:pass@host:80",
                Some("user:pass"),
                Some("host"),
                Some(80),
            ),
        ] {
            let a = Authority::parse(input).unwrap();
            assert_eq!(a.as_str(), normalized, "{input}");
            assert_eq!(a.userinfo(), userinfo, "{input}");
            assert_eq!(a.host().map(ToString::to_string).as_deref(), host, "{input}");
            assert_eq!(a.port(), port, "{input}");
        }
    }

    #[test]
    fn port_leading_zeros() {
        assert_eq!(Authority::parse("host:0080").unwrap().as_str(), "host:80");
        assert_eq!(Authority::parse("host:000").unwrap().as_str(), "host:0");
        assert_eq!(Authority::parse("host:0").unwrap().port(), Some(0));
    }

    #[test]
    fn port_out_of_range() {
        let err = Authority::parse("host:65536").unwrap_err();
        assert_eq!(err.position(), 5);
        assert!(matches!(err.kind(), ParseErrorKind::RangeViolation { .. }));
    }

    #[test]
    fn userinfo_percent_normalized() {
        let a = Authority::parse("us%65r:p%40ss@host").unwrap();
        assert_eq!(a.userinfo(), Some("user:p%40ss"));
        assert_eq!(a.password(), Some("p%40ss"));
    }

    #[test]
    fn username_and_password() {
        let a = Authority::parse("user:pa:ss@host").unwrap();
        assert_eq!(a.username(), Some("user"));
        assert_eq!(a.password(), Some("pa:ss"));

        let a = Authority::parse("user@host").unwrap();
        assert_eq!(a.username(), Some("user"));
        assert_eq!(a.password(), None);
    }

    #[test]
    fn host_port_skips_userinfo() {
        let a = Authority::parse("user:pass@[::1]:80").unwrap();
        assert_eq!(a.host_port(), "[::1]:80");
    }

    #[test]
    fn parse_invalid_userinfo() {
        let err = Authority::parse("us er@localhost").unwrap_err();
        assert_eq!(err.position(), 2);
        assert!(matches!(err.kind(), ParseErrorKind::InvalidCharacter { .. }));
    }

    #[test]
    fn parse_missing_host() {
        for (input, position) in [("", 0), ("@", 1)] {
            let err = Authority::parse(input).unwrap_err();
            assert_eq!(err.position(), position);
            assert_eq!(
                err.kind(),
                &ParseErrorKind::MissingComponent { component: "host" }
            );
        }
    }

    #[test]
    fn parse_invalid_ipv6_literal() {
        for (input, position) in [
            ("[:", 0),
            ("[:]", 0),
            ("@[:]", 1),
            ("[:]:42", 0),
            ("@[:]:42", 1),
        ] {
            let err = Authority::parse(input).unwrap_err();
            assert_eq!(err.position(), position, "{input}");
            assert_eq!(
                err.kind(),
                &ParseErrorKind::StructuralConflict {
                    reason: "invalid IPv6 literal"
                }
            );
        }
    }

    #[test]
    fn parse_invalid_ipv6() {
        let err = Authority::parse("[1:2]").unwrap_err();
        assert_eq!(err.position(), 4);
        assert!(matches!(err.kind(), ParseErrorKind::StructuralConflict { .. }));
    }

    #[test]
    fn parse_garbage_after_ipv6() {
        let err = Authority::parse("[::1]x").unwrap_err();
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn parse_invalid_host() {
        let err = Authority::parse("exa mple.com").unwrap_err();
        assert_eq!(err.position(), 3);

        let err = Authority::parse("user@exa mple.com").unwrap_err();
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn parse_missing_port() {
        for (input, position) in [("example.com:", 12), ("@example.com:", 13)] {
            let err = Authority::parse(input).unwrap_err();
            assert_eq!(err.position(), position, "{input}");
            assert_eq!(
                err.kind(),
                &ParseErrorKind::MissingComponent { component: "port" }
            );
        }
    }

    #[test]
    fn parse_invalid_port() {
        for input in ["example.com:8a", "example.com:0x42"] {
            let err = Authority::parse(input).unwrap_err();
            assert_eq!(err.position(), 13, "{input}");
            assert!(matches!(err.kind(), ParseErrorKind::InvalidCharacter { .. }));
        }
    }

    #[test]
    fn display_masks_password() {
        for (input, masked) in [
            ("user:@host", "user:****@host"),
            ("user:secret@host", "user:****@host"),
            ("user:secret@host:80", "user:****@host:80"),
            ("user@host", "user@host"),
            ("host", "host"),
        ] {
            let a = Authority::parse(input).unwrap();
            assert_eq!(a.to_string(), masked, "{input}");
        }
    }

    #[test]
    fn with_userinfo() {
        let a = Authority::parse("host").unwrap();
        assert_eq!(a.with_userinfo("user:pass").unwrap().as_str(), "user:pass@host");

        let a = Authority::parse("user@host").unwrap();
        assert_eq!(a.with_userinfo("admin").unwrap().as_str(), "admin@host");
        assert_eq!(a.with_userinfo("").unwrap().as_str(), "host");
        assert_eq!(a.without_userinfo().as_str(), "host");
        assert!(a.with_userinfo("a b").is_err());
    }

    #[test]
    fn with_host() {
        let a = Authority::parse("user:pass@host:80").unwrap();
        let b = a.with_host("example.com").unwrap();
        assert_eq!(b.as_str(), "user:pass@example.com:80");

        let c = a.with_host("::1").unwrap();
        assert_eq!(c.as_str(), "user:pass@[::1]:80");

        assert!(a.with_host("-bad").is_err());
    }

    #[test]
    fn with_port() {
        let a = Authority::parse("user:pass@host").unwrap();
        assert_eq!(a.with_port(80).as_str(), "user:pass@host:80");
        let b = a.with_port(80).with_port(443);
        assert_eq!(b.as_str(), "user:pass@host:443");
        assert_eq!(b.without_port().unwrap().as_str(), "user:pass@host");
    }

    #[test]
    fn without_port_requires_host() {
        let a = Authority::parse(":80").unwrap();
        assert!(a.without_port().is_err());
    }

    #[test]
    fn reparse_is_stable() {
        for input in ["user:p%40ss@[0::1]:080", "@HOST:1", "x%2fy@h"] {
            let once = Authority::parse(input).unwrap();
            let twice = Authority::parse(once.as_str()).unwrap();
            assert_eq!(once, twice, "{input}");
        }
    }
}
