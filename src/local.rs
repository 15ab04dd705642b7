//! Local socket addresses: `network:address` pairs ready for a bind.
//!
//! # Grammar Reference
//!
//! ```abnf
//! local   = [ network ] ":" address
//! network = "tcp" / "tcp4" / "tcp6" / "udp" / "udp4" / "udp6" / "unix"
//! address = [ host ] ":" port / port / path
//! ```
//!
//! The IP family suffix of the network always agrees with the host:
//! an IPv4 host forces `4`, an IPv6 host forces `6` and a domain drops the
//! suffix. A suffix without a host binds to the unspecified address of
//! that family.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::authority::{Authority, parse_port};
use crate::char_class::is_digit;
use crate::constants::{IPV4_UNSPECIFIED_HOST, IPV6_UNSPECIFIED_HOST};
use crate::error::ParseError;
use crate::host::Host;
use crate::ipv4::Ipv4;
use crate::ipv6::Ipv6;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// IP address family forced by a `4` or `6` network suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

/// A network token.
///
/// # Examples
///
/// ```
/// use addr_canon::{IpFamily, Network};
///
/// let network = Network::parse("udp6").unwrap();
/// assert_eq!(network.protocol(), Network::Udp);
/// assert_eq!(network.family(), Some(IpFamily::V6));
/// assert!(network.is_dgram());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Network {
    /// TCP over either IP family
    Tcp,
    /// TCP over IPv4
    Tcp4,
    /// TCP over IPv6
    Tcp6,
    /// UDP over either IP family
    Udp,
    /// UDP over IPv4
    Udp4,
    /// UDP over IPv6
    Udp6,
    /// Unix domain socket
    Unix,
}

impl Network {
    /// Parses a network token. Tokens are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the token is not a known network.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(match input {
            "tcp" => Self::Tcp,
            "tcp4" => Self::Tcp4,
            "tcp6" => Self::Tcp6,
            "udp" => Self::Udp,
            "udp4" => Self::Udp4,
            "udp6" => Self::Udp6,
            "unix" => Self::Unix,
            "" => return Err(ParseError::missing(0, "network")),
            _ => return Err(ParseError::conflict(0, "unrecognized network")),
        })
    }

    /// Returns the token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
            Self::Udp => "udp",
            Self::Udp4 => "udp4",
            Self::Udp6 => "udp6",
            Self::Unix => "unix",
        }
    }

    /// Returns the network without its family suffix.
    #[must_use]
    pub const fn protocol(self) -> Self {
        match self {
            Self::Tcp | Self::Tcp4 | Self::Tcp6 => Self::Tcp,
            Self::Udp | Self::Udp4 | Self::Udp6 => Self::Udp,
            Self::Unix => Self::Unix,
        }
    }

    /// Returns the IP family forced by the suffix, if any.
    #[must_use]
    pub const fn family(self) -> Option<IpFamily> {
        match self {
            Self::Tcp4 | Self::Udp4 => Some(IpFamily::V4),
            Self::Tcp6 | Self::Udp6 => Some(IpFamily::V6),
            Self::Tcp | Self::Udp | Self::Unix => None,
        }
    }

    /// Returns true for connection-oriented networks.
    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self.protocol(), Self::Tcp | Self::Unix)
    }

    /// Returns true for datagram networks.
    #[must_use]
    pub const fn is_dgram(self) -> bool {
        matches!(self.protocol(), Self::Udp)
    }

    const fn with_family(self, family: Option<IpFamily>) -> Self {
        match (self.protocol(), family) {
            (Self::Tcp, None) => Self::Tcp,
            (Self::Tcp, Some(IpFamily::V4)) => Self::Tcp4,
            (Self::Tcp, Some(IpFamily::V6)) => Self::Tcp6,
            (Self::Udp, None) => Self::Udp,
            (Self::Udp, Some(IpFamily::V4)) => Self::Udp4,
            (Self::Udp, Some(IpFamily::V6)) => Self::Udp6,
            _ => Self::Unix,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated local address of any network.
///
/// Paths starting with `/` or `.` and the `unix` network are Unix
/// sockets, `udp*` networks are UDP, everything else is TCP.
///
/// # Examples
///
/// ```
/// use addr_canon::{Local, Network};
///
/// let local = Local::parse("0.0.0.0:80").unwrap();
/// assert_eq!(local.as_str(), "tcp4:0.0.0.0:80");
/// assert_eq!(local.network(), Network::Tcp4);
/// assert_eq!(local.address(), "0.0.0.0:80");
///
/// let local = Local::parse("/run/app.sock").unwrap();
/// assert_eq!(local.as_str(), "unix:/run/app.sock");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Local {
    network: Network,
    host: Option<Host>,
    port: Option<u16>,
    normalized: String,
}

impl Local {
    /// Parses a local address of any network.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is empty, has no port, has
    /// userinfo, or names a host of the wrong IP family for its network.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if is_path(input) {
            return parse_unix(input);
        }
        let (token, _) = Self::split(input);
        match Network::parse(token).map(Network::protocol) {
            Ok(Network::Unix) => parse_unix(input),
            Ok(Network::Udp) => parse_ip(input, Network::Udp),
            _ => parse_ip(input, Network::Tcp),
        }
    }

    /// Splits raw input at the first `:` without validating it.
    ///
    /// Input without a `:` is all network.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Local;
    ///
    /// assert_eq!(Local::split(":80"), ("", "80"));
    /// assert_eq!(Local::split("tcp4::80"), ("tcp4", ":80"));
    /// ```
    #[must_use]
    pub fn split(input: &str) -> (&str, &str) {
        input.split_once(':').unwrap_or((input, ""))
    }

    fn socket(network: Network, host: Option<Host>, port: u16) -> Self {
        let host_str = host.as_ref().map(ToString::to_string).unwrap_or_default();
        Self {
            normalized: format!("{network}:{host_str}:{port}"),
            network,
            host,
            port: Some(port),
        }
    }

    fn unix(path: &str) -> Self {
        Self {
            network: Network::Unix,
            host: None,
            port: None,
            normalized: format!("unix:{path}"),
        }
    }

    /// Returns the canonical `network:address` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the network.
    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Returns the address part, as a bind call expects it.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.normalized[self.network.as_str().len() + 1..]
    }

    /// Returns the host; `None` for Unix sockets and "all interfaces".
    #[must_use]
    pub const fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    /// Returns the port; `None` for Unix sockets.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the socket path of a Unix socket.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        matches!(self.network, Network::Unix).then(|| self.address())
    }

    /// Returns a new address bound to `host`.
    ///
    /// A host starting with `/` or `.` turns the address into a Unix
    /// socket. Otherwise the family suffix is re-derived from the new host
    /// and the port is kept.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the host is empty or invalid, or if this is
    /// a Unix socket and the new host is not a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Local;
    ///
    /// let local = Local::parse("tcp4:0.0.0.0:80").unwrap();
    /// assert_eq!(local.with_host("::1").unwrap().as_str(), "tcp6:[::1]:80");
    /// assert_eq!(local.with_host("localhost").unwrap().as_str(), "tcp:localhost:80");
    /// ```
    pub fn with_host(&self, host: &str) -> Result<Self, ParseError> {
        if host.is_empty() {
            return Err(ParseError::missing(0, "host"));
        }
        if is_path(host) {
            return Ok(Self::unix(host));
        }
        let Some(port) = self.port else {
            return Err(ParseError::conflict(0, "a Unix socket address has no host"));
        };
        let host = Host::parse(host)?;
        let network = self.network.with_family(family_of(&host));
        Ok(Self::socket(network, Some(host), port))
    }

    /// Returns a new address with the given port and the same network.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for a Unix socket, which has no port.
    pub fn with_port(&self, port: u16) -> Result<Self, ParseError> {
        if self.port.is_none() {
            return Err(ParseError::conflict(0, "a Unix socket address has no port"));
        }
        Ok(Self::socket(self.network, self.host.clone(), port))
    }

    /// Returns the host and port a client connects to for this address.
    ///
    /// Unspecified or omitted hosts are replaced by the loopback address
    /// of the network's family, IPv4 unless the family is IPv6. Returns
    /// `None` for Unix sockets.
    pub(crate) fn loopback(&self) -> Option<(Host, u16)> {
        let port = self.port?;
        let host = match &self.host {
            Some(host) if !host.is_unspecified() => host.clone(),
            _ => match self.network.family().or_else(|| self.host.as_ref().and_then(family_of)) {
                Some(IpFamily::V6) => Host::Ipv6(Ipv6::from(Ipv6Addr::LOCALHOST)),
                _ => Host::Ipv4(Ipv4::from(Ipv4Addr::LOCALHOST)),
            },
        };
        Some((host, port))
    }
}

canonical_string!(Local, display);

const fn family_of(host: &Host) -> Option<IpFamily> {
    match host {
        Host::Ipv4(_) => Some(IpFamily::V4),
        Host::Ipv6(_) => Some(IpFamily::V6),
        Host::Domain(_) => None,
    }
}

fn is_path(input: &str) -> bool {
    input.starts_with(['/', '.'])
}

/// Normalizes a TCP or UDP address; `base` is the unsuffixed network.
///
/// An unrecognized network token is not an error: the whole input is
/// read as `host:port` instead.
pub(crate) fn parse_ip(input: &str, base: Network) -> Result<Local, ParseError> {
    if input.is_empty() {
        return Err(ParseError::missing(0, "local address"));
    }

    let (explicit, address, offset) = match input.split_once(':') {
        Some(("", address)) => (None, address, 1),
        Some((token, address)) => match Network::parse(token) {
            Ok(network) if network.protocol() == base => (Some(network), address, token.len() + 1),
            _ => {
                tracing::debug!(
                    network = token,
                    fallback = %base,
                    "unrecognized network, reading input as host:port"
                );
                (None, input, 0)
            }
        },
        None => (None, input, 0),
    };
    if address.is_empty() {
        return Err(ParseError::missing(input.len(), "port"));
    }

    let (host, port) = if address.bytes().all(is_digit) {
        let port = parse_port(address).map_err(|e| e.offset_by(offset))?;
        (None, port)
    } else {
        let authority = Authority::parse(address).map_err(|e| e.offset_by(offset))?;
        if authority.userinfo().is_some() {
            return Err(ParseError::conflict(
                offset,
                "userinfo is not allowed in a local address",
            ));
        }
        let port = authority
            .port()
            .ok_or_else(|| ParseError::missing(input.len(), "port"))?;
        (authority.host().cloned(), port)
    };

    let wanted = explicit.and_then(Network::family);
    let (family, host) = match host {
        None => match wanted {
            Some(IpFamily::V4) => (wanted, Some(Host::parse(IPV4_UNSPECIFIED_HOST)?)),
            Some(IpFamily::V6) => (wanted, Some(Host::parse(IPV6_UNSPECIFIED_HOST)?)),
            None => (None, None),
        },
        Some(host) => {
            let family = family_of(&host);
            match (wanted, family) {
                (Some(IpFamily::V6), Some(IpFamily::V4)) => {
                    return Err(ParseError::conflict(
                        offset,
                        "IPv4 host with an IPv6-only network",
                    ));
                }
                (Some(IpFamily::V4), Some(IpFamily::V6)) => {
                    return Err(ParseError::conflict(
                        offset,
                        "IPv6 host with an IPv4-only network",
                    ));
                }
                _ => (family, Some(host)),
            }
        }
    };

    Ok(Local::socket(base.with_family(family), host, port))
}

/// Normalizes a Unix socket address: `unix:<path>`, `:<path>` or a bare
/// path starting with `/` or `.`.
pub(crate) fn parse_unix(input: &str) -> Result<Local, ParseError> {
    let (path, offset) = if is_path(input) {
        (input, 0)
    } else {
        match Local::split(input) {
            ("" | "unix", path) => (path, input.len() - path.len()),
            _ => return Err(ParseError::conflict(0, "network must be unix")),
        }
    };
    if path.is_empty() {
        return Err(ParseError::missing(offset, "socket path"));
    }
    Ok(Local::unix(path))
}

/// A local address type with a fixed set of networks.
///
/// This trait is sealed. It exposes the `(network, address)` pair a
/// listener needs and re-validates the network family on every builder.
///
/// # Examples
///
/// ```
/// use addr_canon::{LocalLike, Network, TcpLocal};
///
/// let local = TcpLocal::parse(":8080").unwrap();
/// assert_eq!(local.network(), Network::Tcp);
/// assert_eq!(local.address(), ":8080");
///
/// let local = local.with_host("127.0.0.1").unwrap();
/// assert_eq!(local.as_str(), "tcp4:127.0.0.1:8080");
/// assert!(local.with_host("/run/app.sock").is_err());
/// ```
pub trait LocalLike: sealed::Sealed + Sized {
    /// Returns the underlying local address.
    fn as_local(&self) -> &Local;

    /// Narrows a local address to this type.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the network is not allowed for this type.
    fn try_from_local(local: Local) -> Result<Self, ParseError>;

    /// Returns the network.
    fn network(&self) -> Network {
        self.as_local().network()
    }

    /// Returns the address part.
    fn address(&self) -> &str {
        self.as_local().address()
    }

    /// Returns a new address bound to `host`. See [`Local::with_host`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the host is invalid or changes the network
    /// to one this type does not allow.
    fn with_host(&self, host: &str) -> Result<Self, ParseError> {
        Self::try_from_local(self.as_local().with_host(host)?)
    }

    /// Returns a new address with the given port.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for a Unix socket.
    fn with_port(&self, port: u16) -> Result<Self, ParseError> {
        Self::try_from_local(self.as_local().with_port(port)?)
    }
}

impl sealed::Sealed for Local {}

impl LocalLike for Local {
    fn as_local(&self) -> &Local {
        self
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        Ok(local)
    }
}

fn require(local: Local, allowed: &[Network], reason: &'static str) -> Result<Local, ParseError> {
    if allowed.contains(&local.network.protocol()) {
        Ok(local)
    } else {
        Err(ParseError::conflict(0, reason))
    }
}

/// A TCP local address.
///
/// # Examples
///
/// ```
/// use addr_canon::TcpLocal;
///
/// assert_eq!(TcpLocal::parse(":80").unwrap().as_str(), "tcp::80");
/// assert_eq!(TcpLocal::parse("[::]:80").unwrap().as_str(), "tcp6:[::]:80");
/// assert_eq!(TcpLocal::parse("tcp4::80").unwrap().as_str(), "tcp4:0.0.0.0:80");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TcpLocal(Local);

impl TcpLocal {
    /// Parses a TCP local address.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is not a valid TCP address.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_ip(input, Network::Tcp).map(Self)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl sealed::Sealed for TcpLocal {}

impl LocalLike for TcpLocal {
    fn as_local(&self) -> &Local {
        &self.0
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        require(local, &[Network::Tcp], "network must be tcp").map(Self)
    }
}

canonical_string!(TcpLocal, display);

/// A UDP local address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdpLocal(Local);

impl UdpLocal {
    /// Parses a UDP local address.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is not a valid UDP address.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_ip(input, Network::Udp).map(Self)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl sealed::Sealed for UdpLocal {}

impl LocalLike for UdpLocal {
    fn as_local(&self) -> &Local {
        &self.0
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        require(local, &[Network::Udp], "network must be udp").map(Self)
    }
}

canonical_string!(UdpLocal, display);

/// A Unix socket address. The path is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnixLocal(Local);

impl UnixLocal {
    /// Parses a Unix socket address.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the network is not `unix` or the path is
    /// empty.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_unix(input).map(Self)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the socket path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.address()
    }
}

impl sealed::Sealed for UnixLocal {}

impl LocalLike for UnixLocal {
    fn as_local(&self) -> &Local {
        &self.0
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        require(local, &[Network::Unix], "network must be unix").map(Self)
    }
}

canonical_string!(UnixLocal, display);

/// A TCP or UDP local address. The network must be given explicitly.
///
/// # Examples
///
/// ```
/// use addr_canon::TcpUdpLocal;
///
/// assert_eq!(TcpUdpLocal::parse("udp:[::]:53").unwrap().as_str(), "udp6:[::]:53");
/// assert!(TcpUdpLocal::parse(":53").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TcpUdpLocal(Local);

impl TcpUdpLocal {
    /// Parses a TCP or UDP local address.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the network is missing or is not one of
    /// the `tcp` and `udp` families, or if the address is invalid.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::missing(0, "local address"));
        }
        let (token, _) = Local::split(input);
        match Network::parse(token)?.protocol() {
            base @ (Network::Tcp | Network::Udp) => parse_ip(input, base).map(Self),
            _ => Err(ParseError::conflict(0, "network must be tcp or udp")),
        }
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl sealed::Sealed for TcpUdpLocal {}

impl LocalLike for TcpUdpLocal {
    fn as_local(&self) -> &Local {
        &self.0
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        require(
            local,
            &[Network::Tcp, Network::Udp],
            "network must be tcp or udp",
        )
        .map(Self)
    }
}

canonical_string!(TcpUdpLocal, display);

/// A TCP or Unix socket local address.
///
/// Input starting with `/` or `.`, or with the `unix` network, is a Unix
/// socket; anything else is TCP.
///
/// # Examples
///
/// ```
/// use addr_canon::TcpUnixLocal;
///
/// assert_eq!(TcpUnixLocal::parse("./app.sock").unwrap().as_str(), "unix:./app.sock");
/// assert_eq!(TcpUnixLocal::parse(":80").unwrap().as_str(), "tcp::80");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TcpUnixLocal(Local);

impl TcpUnixLocal {
    /// Parses a TCP or Unix socket local address.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is not a valid TCP or Unix
    /// socket address.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if is_path(input) || Local::split(input).0 == "unix" {
            parse_unix(input).map(Self)
        } else {
            parse_ip(input, Network::Tcp).map(Self)
        }
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl sealed::Sealed for TcpUnixLocal {}

impl LocalLike for TcpUnixLocal {
    fn as_local(&self) -> &Local {
        &self.0
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        require(
            local,
            &[Network::Tcp, Network::Unix],
            "network must be tcp or unix",
        )
        .map(Self)
    }
}

canonical_string!(TcpUnixLocal, display);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn split() {
        assert_eq!(Local::split(":80"), ("", "80"));
        assert_eq!(Local::split("tcp:80"), ("tcp", "80"));
        assert_eq!(Local::split("tcp4::80"), ("tcp4", ":80"));
        assert_eq!(Local::split("unix"), ("unix", ""));
    }

    #[test]
    fn network_tokens() {
        for network in [
            Network::Tcp,
            Network::Tcp4,
            Network::Tcp6,
            Network::Udp,
            Network::Udp4,
            Network::Udp6,
            Network::Unix,
        ] {
            assert_eq!(Network::parse(network.as_str()).unwrap(), network);
            assert_eq!(network.with_family(network.family()), network);
        }
        assert!(Network::parse("TCP").is_err());
        assert!(Network::parse("sctp").is_err());
        assert!(Network::Unix.is_stream());
        assert!(!Network::Udp4.is_stream());
        assert!(Network::Udp4.is_dgram());
    }

    #[test]
    fn tcp_family_inference() {
        for (input, want) in [
            (":80", "tcp::80"),
            ("0.0.0.0:80", "tcp4:0.0.0.0:80"),
            ("[::]:80", "tcp6:[::]:80"),
            ("tcp::80", "tcp::80"),
            ("tcp4::80", "tcp4:0.0.0.0:80"),
            ("tcp6::80", "tcp6:[::]:80"),
            ("tcp:80", "tcp::80"),
            ("tcp4:80", "tcp4:0.0.0.0:80"),
            ("tcp:0.0.0.0:443", "tcp4:0.0.0.0:443"),
            ("tcp:[0::1]:0443", "tcp6:[::1]:443"),
            ("localhost:80", "tcp:localhost:80"),
            ("tcp4:localhost:80", "tcp:localhost:80"),
        ] {
            assert_eq!(TcpLocal::parse(input).unwrap().as_str(), want, "{input}");
        }
    }

    #[test]
    fn udp_family_inference() {
        for (input, want) in [
            (":53", "udp::53"),
            ("udp:[::]:53", "udp6:[::]:53"),
            ("udp4::53", "udp4:0.0.0.0:53"),
            ("127.0.0.1:53", "udp4:127.0.0.1:53"),
        ] {
            assert_eq!(UdpLocal::parse(input).unwrap().as_str(), want, "{input}");
        }
    }

    #[test]
    fn family_conflicts() {
        let err = TcpLocal::parse("tcp6:0.0.0.0:80").unwrap_err();
        assert_eq!(err.position(), 5);
        assert!(matches!(err.kind(), ParseErrorKind::StructuralConflict { .. }));

        let err = TcpLocal::parse("tcp4:[::]:80").unwrap_err();
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn unknown_network_falls_back_to_host_port() {
        let local = TcpLocal::parse("udp:80").unwrap();
        assert_eq!(local.as_str(), "tcp:udp:80");
    }

    #[test]
    fn invalid_local_addresses() {
        let err = TcpLocal::parse("").unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::MissingComponent {
                component: "local address"
            }
        );

        let err = TcpLocal::parse("tcp:localhost").unwrap_err();
        assert_eq!(err.position(), 13);
        assert_eq!(
            err.kind(),
            &ParseErrorKind::MissingComponent { component: "port" }
        );

        for input in ["tcp:", "tcp4:", ":"] {
            let err = TcpLocal::parse(input).unwrap_err();
            assert_eq!(err.position(), input.len(), "{input}");
            assert_eq!(
                err.kind(),
                &ParseErrorKind::MissingComponent { component: "port" },
                "{input}"
            );
        }
        let err = UdpLocal::parse("udp6:").unwrap_err();
        assert_eq!(err.position(), 5);

        let err = TcpLocal::parse("tcp:user@host:80").unwrap_err();
        assert_eq!(err.position(), 4);

        let err = TcpLocal::parse("tcp:99999").unwrap_err();
        assert_eq!(err.position(), 4);
        assert!(matches!(err.kind(), ParseErrorKind::RangeViolation { .. }));

        let err = TcpLocal::parse("tcp4:exa mple:80").unwrap_err();
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn unix_addresses() {
        for (input, want) in [
            ("/run/app.sock", "unix:/run/app.sock"),
            ("./app.sock", "unix:./app.sock"),
            ("unix:/run/app.sock", "unix:/run/app.sock"),
            (":/run/app.sock", "unix:/run/app.sock"),
            ("unix:app.sock", "unix:app.sock"),
        ] {
            let local = UnixLocal::parse(input).unwrap();
            assert_eq!(local.as_str(), want, "{input}");
        }
        assert_eq!(UnixLocal::parse("/a").unwrap().path(), "/a");

        let err = UnixLocal::parse("unix:").unwrap_err();
        assert_eq!(err.position(), 5);
        assert!(UnixLocal::parse("tcp:/a").is_err());
        assert!(UnixLocal::parse("").is_err());
    }

    #[test]
    fn tcp_udp_requires_network() {
        assert_eq!(TcpUdpLocal::parse("tcp::80").unwrap().as_str(), "tcp::80");
        assert_eq!(TcpUdpLocal::parse("udp4::53").unwrap().as_str(), "udp4:0.0.0.0:53");

        let err = TcpUdpLocal::parse(":80").unwrap_err();
        assert_eq!(
            err.kind(),
            &ParseErrorKind::MissingComponent { component: "network" }
        );
        assert!(TcpUdpLocal::parse("unix:/a").is_err());
        assert!(TcpUdpLocal::parse("localhost:80").is_err());
    }

    #[test]
    fn tcp_unix_detects_family() {
        for (input, want) in [
            (":80", "tcp::80"),
            ("[::1]:80", "tcp6:[::1]:80"),
            ("/a.sock", "unix:/a.sock"),
            ("./a.sock", "unix:./a.sock"),
            ("unix:/a.sock", "unix:/a.sock"),
            ("tcp:80", "tcp::80"),
            ("localhost:80", "tcp:localhost:80"),
        ] {
            assert_eq!(TcpUnixLocal::parse(input).unwrap().as_str(), want, "{input}");
        }
    }

    #[test]
    fn generic_local_dispatch() {
        assert_eq!(Local::parse("udp:80").unwrap().network(), Network::Udp);
        assert_eq!(Local::parse(":80").unwrap().network(), Network::Tcp);
        assert_eq!(Local::parse("/s").unwrap().network(), Network::Unix);
        assert_eq!(Local::parse("unix:/s").unwrap().path(), Some("/s"));
        assert_eq!(Local::parse(":80").unwrap().path(), None);
    }

    #[test]
    fn accessors() {
        let local = Local::parse("tcp6:[::1]:443").unwrap();
        assert_eq!(local.network(), Network::Tcp6);
        assert_eq!(local.address(), "[::1]:443");
        assert_eq!(local.host().map(ToString::to_string).as_deref(), Some("[::1]"));
        assert_eq!(local.port(), Some(443));

        let local = Local::parse(":80").unwrap();
        assert_eq!(local.address(), ":80");
        assert!(local.host().is_none());
    }

    #[test]
    fn with_host_rederives_family() {
        let local = TcpUdpLocal::parse("udp:[::]:53").unwrap();
        let local = local.with_host("10.0.0.1").unwrap();
        assert_eq!(local.as_str(), "udp4:10.0.0.1:53");
        let local = local.with_host("dns.local").unwrap();
        assert_eq!(local.as_str(), "udp:dns.local:53");
        assert!(local.with_host("/a.sock").is_err());
        assert!(local.with_host("").is_err());
    }

    #[test]
    fn with_host_switches_to_unix() {
        let local = TcpUnixLocal::parse(":80").unwrap();
        let local = local.with_host("/run/a.sock").unwrap();
        assert_eq!(local.as_str(), "unix:/run/a.sock");
        assert!(local.with_host("127.0.0.1").is_err());
        assert!(local.with_port(80).is_err());
    }

    #[test]
    fn with_port_keeps_network() {
        let local = TcpLocal::parse("tcp6::80").unwrap();
        assert_eq!(local.with_port(8080).unwrap().as_str(), "tcp6:[::]:8080");
    }

    #[test]
    fn loopback() {
        for (input, want) in [
            ("tcp::80", Some("127.0.0.1:80")),
            ("tcp4::80", Some("127.0.0.1:80")),
            ("tcp6::80", Some("[::1]:80")),
            ("[::]:80", Some("[::1]:80")),
            ("10.0.0.1:80", Some("10.0.0.1:80")),
            ("localhost:80", Some("localhost:80")),
            ("/a.sock", None),
        ] {
            let local = Local::parse(input).unwrap();
            let connect = local
                .loopback()
                .map(|(host, port)| format!("{host}:{port}"));
            assert_eq!(connect.as_deref(), want, "{input}");
        }
    }
}
