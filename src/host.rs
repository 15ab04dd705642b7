//! Host component of an authority.
//!
//! ```abnf
//! host = "[" IPv6 "]" / IPv4 / domain
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::Domain;
use crate::error::ParseError;
use crate::ipv4::Ipv4;
use crate::ipv6::Ipv6;

/// A validated host: an IPv4 address, an IPv6 address or a domain name.
///
/// IPv6 hosts are always written in brackets so they embed unambiguously
/// in an authority.
///
/// # Examples
///
/// ```
/// use addr_canon::Host;
///
/// let host = Host::parse("::1").unwrap();
/// assert_eq!(host.to_string(), "[::1]");
/// assert!(host.is_localhost());
///
/// let host = Host::parse("Example.com").unwrap();
/// assert!(host.is_domain());
/// assert_eq!(host.to_string(), "example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// An IPv4 address (e.g., "192.168.1.1")
    Ipv4(Ipv4),
    /// An IPv6 address (e.g., `[::1]`)
    Ipv6(Ipv6),
    /// A domain name (e.g., "example.com")
    Domain(Domain),
}

impl Host {
    /// Parses a host.
    ///
    /// Input that starts with `[` or contains `:` must be an IPv6 address,
    /// bracketed or not. Anything else is tried as IPv4 and then as a
    /// domain name; if both fail the domain error is returned.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is not a valid host.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.starts_with('[') || input.contains(':') {
            return Ipv6::parse(input).map(Self::Ipv6);
        }
        if let Ok(ip) = Ipv4::parse(input) {
            return Ok(Self::Ipv4(ip));
        }
        Domain::parse(input).map(Self::Domain)
    }

    /// Returns true if this is an IPv4 address.
    #[must_use]
    pub const fn is_ipv4(&self) -> bool {
        matches!(self, Self::Ipv4(_))
    }

    /// Returns true if this is an IPv6 address.
    #[must_use]
    pub const fn is_ipv6(&self) -> bool {
        matches!(self, Self::Ipv6(_))
    }

    /// Returns true if this is a domain name.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Returns true for `localhost` and loopback addresses.
    #[must_use]
    pub fn is_localhost(&self) -> bool {
        match self {
            Self::Ipv4(ip) => ip.is_loopback(),
            Self::Ipv6(ip) => ip.is_loopback(),
            Self::Domain(d) => d.is_localhost(),
        }
    }

    /// Returns true for `0.0.0.0` and `[::]`.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        match self {
            Self::Ipv4(ip) => ip.is_unspecified(),
            Self::Ipv6(ip) => ip.is_unspecified(),
            Self::Domain(_) => false,
        }
    }

    /// Returns true for private IP addresses. Domains are never private.
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self {
            Self::Ipv4(ip) => ip.is_private(),
            Self::Ipv6(ip) => ip.is_private(),
            Self::Domain(_) => false,
        }
    }

    /// Returns the host without IPv6 brackets.
    #[must_use]
    pub fn host_str(&self) -> &str {
        match self {
            Self::Ipv4(ip) => ip.as_str(),
            Self::Ipv6(ip) => ip.as_str(),
            Self::Domain(d) => d.as_str(),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv6(ip) => write!(f, "[{ip}]"),
            other => f.write_str(other.host_str()),
        }
    }
}

impl FromStr for Host {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Host {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl PartialOrd for Host {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Host {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Domain(a), Self::Domain(b)) => a.cmp(b),
            (Self::Ipv4(a), Self::Ipv4(b)) => a.octets().cmp(&b.octets()),
            (Self::Ipv6(a), Self::Ipv6(b)) => a.segments().cmp(&b.segments()),
            (Self::Domain(_), _) | (Self::Ipv4(_), Self::Ipv6(_)) => Ordering::Less,
            (_, Self::Domain(_)) | (Self::Ipv6(_), Self::Ipv4(_)) => Ordering::Greater,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Host {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Host {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
