//! ICE server URIs: STUN (RFC 7064) and TURN (RFC 7065).

use std::fmt;
use std::str::FromStr;

use crate::constants::{STUN_DEFAULT_PORT, STUNS_DEFAULT_PORT};
use crate::error::ParseError;
use crate::host::Host;
use crate::local::{self, Local, LocalLike, Network, TcpUdpLocal};
use crate::url::{self, Layout, Url, UrlLike};

/// Transport requested by a TURN URI's `transport` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `transport=udp`
    Udp,
    /// `transport=tcp`
    Tcp,
}

impl Transport {
    /// Parses `udp` or `tcp`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for any other value.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        match input {
            "udp" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            _ => Err(ParseError::conflict(0, "transport must be udp or tcp")),
        }
    }

    /// Returns the parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated `stun`, `stuns`, `turn` or `turns` URI.
///
/// ICE URIs are always opaque (`stun:host`), carry no userinfo, path or
/// fragment, and omit the scheme's default port. Only TURN URIs may have
/// a query, holding `transport=udp` or `transport=tcp`.
///
/// # Examples
///
/// ```
/// use addr_canon::{Ice, Transport};
///
/// let ice = Ice::parse("turns://turn.example.com:5349?transport=tcp").unwrap();
/// assert_eq!(ice.as_str(), "turns:turn.example.com?transport=tcp");
/// assert_eq!(ice.port(), 5349);
/// assert!(ice.is_secure());
/// assert_eq!(ice.transport(), Some(Transport::Tcp));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ice {
    url: Url,
    host: Host,
    transport: Option<Transport>,
}

impl Ice {
    /// Parses an ICE URI.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is not a valid URL
    /// - The scheme is not `stun`, `stuns`, `turn` or `turns`
    /// - The host is missing
    /// - Userinfo, a path or a fragment is present
    /// - A STUN URI has a query, or a TURN query has anything but a
    ///   `transport` of `udp` or `tcp`
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (url, layout) = Url::parse_located(input)?;
        Self::checked(url, layout)
    }

    fn checked(url: Url, layout: Layout) -> Result<Self, ParseError> {
        let turn = match url.scheme() {
            "stun" | "stuns" => false,
            "turn" | "turns" => true,
            _ => {
                return Err(ParseError::conflict(
                    0,
                    "scheme must be stun, stuns, turn or turns",
                ));
            }
        };
        if url.userinfo().is_some() {
            return Err(ParseError::conflict(
                layout.authority,
                "ICE URI must not have userinfo",
            ));
        }
        let host = url
            .host()
            .cloned()
            .ok_or_else(|| ParseError::missing(layout.authority, "host"))?;
        if !url.path().is_empty() {
            return Err(ParseError::conflict(layout.path, "ICE URI must not have a path"));
        }
        if url.fragment().is_some() {
            return Err(ParseError::conflict(
                layout.fragment,
                "ICE URI must not have a fragment",
            ));
        }

        let mut transport = None;
        if url.query().is_some() && !turn {
            return Err(ParseError::conflict(layout.query, "STUN URI must not have a query"));
        }
        for (key, value) in url.query_params() {
            if key != "transport" {
                return Err(ParseError::conflict(
                    layout.query,
                    "TURN URI query may only have a transport parameter",
                ));
            }
            if transport.is_some() {
                return Err(ParseError::conflict(
                    layout.query,
                    "TURN URI query must have at most one transport parameter",
                ));
            }
            transport = Some(Transport::parse(value).map_err(|e| e.offset_by(layout.query))?);
        }

        let default = default_port(url.scheme());
        let authority = url.authority().map(|a| a.eliding_port(default));
        Ok(Self {
            url: url.replacing_authority(authority).with_hierarchical(false),
            host,
            transport,
        })
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns true for `stuns` and `turns`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.url.scheme().ends_with('s')
    }

    /// Returns true for `turn` and `turns`.
    #[must_use]
    pub fn is_turn(&self) -> bool {
        self.url.scheme().starts_with("turn")
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the effective port: the explicit one or the scheme's
    /// default.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.url
            .port()
            .unwrap_or_else(|| default_port(self.url.scheme()))
    }

    /// Returns the requested transport of a TURN URI.
    #[must_use]
    pub const fn transport(&self) -> Option<Transport> {
        self.transport
    }
}

fn default_port(scheme: &str) -> u16 {
    if scheme.ends_with('s') {
        STUNS_DEFAULT_PORT
    } else {
        STUN_DEFAULT_PORT
    }
}

impl url::sealed::Sealed for Ice {}

impl UrlLike for Ice {
    fn as_url(&self) -> &Url {
        &self.url
    }

    fn try_from_url(url: Url) -> Result<Self, ParseError> {
        Self::checked(url, Layout::default())
    }
}

canonical_string!(Ice, display);

/// The local address an ICE server listens on: TCP or UDP.
///
/// # Examples
///
/// ```
/// use addr_canon::{IceLocal, LocalLike, Network};
///
/// let local = IceLocal::parse("udp::3478").unwrap();
/// assert_eq!(local.network(), Network::Udp);
/// assert!(local.is_dgram());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IceLocal(TcpUdpLocal);

impl IceLocal {
    /// Parses a listen address. See [`TcpUdpLocal::parse`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is not a valid TCP or UDP
    /// address with an explicit network.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        TcpUdpLocal::parse(input).map(Self)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true for TCP.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        Network::is_stream(self.network())
    }

    /// Returns true for UDP.
    #[must_use]
    pub fn is_dgram(&self) -> bool {
        Network::is_dgram(self.network())
    }
}

impl local::sealed::Sealed for IceLocal {}

impl LocalLike for IceLocal {
    fn as_local(&self) -> &Local {
        self.0.as_local()
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        TcpUdpLocal::try_from_local(local).map(Self)
    }
}

canonical_string!(IceLocal, display);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn canonical_forms() {
        for (input, want) in [
            ("stun:example.com", "stun:example.com"),
            ("stun:example.com:3478", "stun:example.com"),
            ("stun://Example.com:3479", "stun:example.com:3479"),
            ("stuns:example.com:5349", "stuns:example.com"),
            ("stuns:example.com:3478", "stuns:example.com:3478"),
            ("turn:example.com?transport=udp", "turn:example.com?transport=udp"),
            ("turns:example.com:443?transport=tcp", "turns:example.com:443?transport=tcp"),
            ("turn:[::1]:3478", "turn:[::1]"),
            ("turn:example.com?", "turn:example.com"),
        ] {
            assert_eq!(Ice::parse(input).unwrap().as_str(), want, "{input}");
        }
    }

    #[test]
    fn accessors() {
        let ice = Ice::parse("turn:example.com?transport=udp").unwrap();
        assert_eq!(ice.port(), 3478);
        assert!(!ice.is_secure());
        assert!(ice.is_turn());
        assert_eq!(ice.transport(), Some(Transport::Udp));
        assert_eq!(ice.host().to_string(), "example.com");

        let ice = Ice::parse("stuns:example.com").unwrap();
        assert_eq!(ice.port(), 5349);
        assert!(ice.is_secure());
        assert!(!ice.is_turn());
        assert_eq!(ice.transport(), None);
    }

    #[test]
    fn rejections() {
        for (input, position) in [
            ("http:example.com", 0),
            ("stun:user@example.com", 5),
            ("stun:", 5),
            ("stun:example.com/path", 16),
            ("stun:example.com#frag", 16),
            ("stun:example.com?transport=udp", 16),
            ("turn:example.com?foo=bar", 16),
            ("turn:example.com?transport=sctp", 16),
            ("turn:example.com?transport=udp&transport=tcp", 16),
            ("turn:example.com?transport=udp&transport=udp", 16),
        ] {
            let err = Ice::parse(input).unwrap_err();
            assert_eq!(err.position(), position, "{input}");
        }
        let err = Ice::parse("stun:").unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::MissingComponent { component: "host" }
        );
    }

    #[test]
    fn builders_reapply_rules() {
        let ice = Ice::parse("turn:example.com:3479?transport=tcp").unwrap();
        assert_eq!(
            ice.with_port(3478).unwrap().as_str(),
            "turn:example.com?transport=tcp"
        );
        assert_eq!(
            ice.with_host("10.0.0.1").unwrap().as_str(),
            "turn:10.0.0.1:3479?transport=tcp"
        );
    }

    #[test]
    fn transport_tokens() {
        assert_eq!("udp".parse::<Transport>().unwrap(), Transport::Udp);
        assert_eq!(Transport::Tcp.to_string(), "tcp");
        assert!(Transport::parse("UDP").is_err());
    }

    #[test]
    fn local_addresses() {
        let local = IceLocal::parse("udp:0.0.0.0:3478").unwrap();
        assert_eq!(local.as_str(), "udp4:0.0.0.0:3478");
        assert!(local.is_dgram());
        assert!(!local.is_stream());

        let local = IceLocal::parse("tcp6::5349").unwrap();
        assert_eq!(local.as_str(), "tcp6:[::]:5349");
        assert!(local.is_stream());

        assert!(IceLocal::parse(":3478").is_err());
        assert!(IceLocal::parse("unix:/a").is_err());
    }

    #[test]
    fn reparse_is_stable() {
        for input in [
            "stun://Example.com:3478",
            "stuns:example.com:3478",
            "turn:[0::1]:3479?transport=udp",
            "TURNS://turn.example.com:5349?transport=tcp",
        ] {
            let once = Ice::parse(input).unwrap();
            let twice = Ice::parse(once.as_str()).unwrap();
            assert_eq!(once, twice, "{input}");
        }
        for input in ["udp::3478", "tcp4::5349", "udp6:[::1]:3478"] {
            let once = IceLocal::parse(input).unwrap();
            let twice = IceLocal::parse(once.as_str()).unwrap();
            assert_eq!(once, twice, "{input}");
        }
    }
}
