//! IP address unions: bare addresses, `ip:port` pairs and CIDR blocks.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::authority::parse_port;
use crate::error::ParseError;
use crate::ipv4::Ipv4;
use crate::ipv6::Ipv6;

/// An IPv4 or IPv6 address, or the unspecified address written as an
/// empty string.
///
/// The family is chosen from the input's shape: a `:` means IPv6, a `.`
/// means IPv4.
///
/// # Examples
///
/// ```
/// use addr_canon::Ip;
///
/// assert!(Ip::parse("").unwrap().is_unspecified());
/// assert!(Ip::parse("127.0.0.1").unwrap().is_loopback());
/// assert_eq!(Ip::parse("::FFFF:0A00:0001").unwrap().as_str(), "::ffff:10.0.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ip {
    /// The empty string, standing for any address
    Unspecified,
    /// An IPv4 address
    V4(Ipv4),
    /// An IPv6 address
    V6(Ipv6),
}

impl Ip {
    /// Parses an IP address of either family.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is neither a valid IPv4 nor a
    /// valid IPv6 address. IPv4 errors carry the field index, as with
    /// [`Ipv4::parse`].
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, Ipv4::parse)
    }

    /// Like [`Ip::parse`], with IPv4 errors at byte offsets into `input`.
    pub(crate) fn parse_located(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, Ipv4::parse_located)
    }

    fn parse_with(
        input: &str,
        parse_v4: fn(&str) -> Result<Ipv4, ParseError>,
    ) -> Result<Self, ParseError> {
        if input.is_empty() {
            Ok(Self::Unspecified)
        } else if input.contains(':') {
            Ipv6::parse(input).map(Self::V6)
        } else if input.contains('.') {
            parse_v4(input).map(Self::V4)
        } else {
            Err(ParseError::conflict(0, "not an IP address"))
        }
    }

    /// Returns the normalized string representation, unbracketed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::V4(ip) => ip.as_str(),
            Self::V6(ip) => ip.as_str(),
        }
    }

    /// Returns the address as a `std::net::IpAddr`.
    ///
    /// The unspecified address maps to `0.0.0.0`.
    #[must_use]
    pub fn to_ip_addr(&self) -> IpAddr {
        match self {
            Self::Unspecified => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Self::V4(ip) => IpAddr::V4(ip.into()),
            Self::V6(ip) => IpAddr::V6(ip.into()),
        }
    }

    /// Returns the octets in network order: 4 for IPv4 (and the
    /// unspecified address), 16 for IPv6.
    #[must_use]
    pub fn octets(&self) -> Vec<u8> {
        match self {
            Self::Unspecified => vec![0; 4],
            Self::V4(ip) => ip.octets().to_vec(),
            Self::V6(ip) => ip.octets().to_vec(),
        }
    }

    /// Returns true for the empty address, `0.0.0.0` and `::`.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        match self {
            Self::Unspecified => true,
            Self::V4(ip) => ip.is_unspecified(),
            Self::V6(ip) => ip.is_unspecified(),
        }
    }

    /// Returns true for `127.0.0.0/8` and `::1`.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        match self {
            Self::Unspecified => false,
            Self::V4(ip) => ip.is_loopback(),
            Self::V6(ip) => ip.is_loopback(),
        }
    }

    /// Returns true for private IPv4 ranges and `fc00::/7`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self {
            Self::Unspecified => false,
            Self::V4(ip) => ip.is_private(),
            Self::V6(ip) => ip.is_private(),
        }
    }
}

impl From<IpAddr> for Ip {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(ip) => Self::V4(ip.into()),
            IpAddr::V6(ip) => Self::V6(ip.into()),
        }
    }
}

impl From<Ipv4Addr> for Ip {
    fn from(addr: Ipv4Addr) -> Self {
        Self::V4(addr.into())
    }
}

impl From<Ipv6Addr> for Ip {
    fn from(addr: Ipv6Addr) -> Self {
        Self::V6(addr.into())
    }
}

canonical_string!(Ip, display);

/// An IP address with a required port, IPv6 bracketed.
///
/// # Examples
///
/// ```
/// use addr_canon::IpPort;
///
/// let addr = IpPort::parse("[::1]:0080").unwrap();
/// assert_eq!(addr.as_str(), "[::1]:80");
/// assert_eq!(addr.port(), 80);
///
/// assert_eq!(IpPort::parse(":53").unwrap().as_str(), ":53");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpPort {
    ip: Ip,
    port: u16,
    normalized: String,
}

impl IpPort {
    /// Parses an `ip:port` pair.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the port separator is missing, the address
    /// is invalid, or the port is not a number in 0-65535.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let colon = input
            .rfind(':')
            .filter(|&i| input.find(']').is_none_or(|j| j < i))
            .ok_or_else(|| ParseError::missing(input.len(), "port"))?;

        let host = &input[..colon];
        let ip = if host.starts_with('[') {
            Ipv6::parse(host).map(Ip::V6)?
        } else if host.contains(':') {
            return Err(ParseError::conflict(
                0,
                "IPv6 address must be bracketed when followed by a port",
            ));
        } else {
            Ip::parse_located(host)?
        };
        let port = parse_port(&input[colon + 1..]).map_err(|e| e.offset_by(colon + 1))?;
        Ok(Self::new(ip, port))
    }

    /// Creates a pair from its parts.
    #[must_use]
    pub fn new(ip: Ip, port: u16) -> Self {
        let normalized = match &ip {
            Ip::V6(v6) => format!("[{v6}]:{port}"),
            other => format!("{other}:{port}"),
        };
        Self {
            ip,
            port,
            normalized,
        }
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the address.
    #[must_use]
    pub const fn ip(&self) -> &Ip {
        &self.ip
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

canonical_string!(IpPort, display);

/// An IP network in CIDR notation.
///
/// # Examples
///
/// ```
/// use addr_canon::IpCidr;
///
/// let net = IpCidr::parse("10.0.0.0/8").unwrap();
/// assert_eq!(net.prefix_len(), 8);
/// assert!(net.is_private());
///
/// assert!(IpCidr::parse("10.0.0.0/33").is_err());
/// assert!(IpCidr::parse("fd00::/8").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpCidr {
    ip: Ip,
    prefix_len: u8,
    normalized: String,
}

impl IpCidr {
    /// Parses `ip/prefix`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The `/` separator or the address is missing
    /// - The address is invalid
    /// - The prefix is not decimal or exceeds 32 (IPv4) or 128 (IPv6)
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let slash = input
            .rfind('/')
            .ok_or_else(|| ParseError::missing(input.len(), "network prefix"))?;
        if slash == 0 {
            return Err(ParseError::missing(0, "IP address"));
        }

        let ip = Ip::parse_located(&input[..slash])?;
        let max = match ip {
            Ip::V6(_) => 128,
            _ => 32,
        };

        let digits = &input[slash + 1..];
        let pos = slash + 1;
        if digits.is_empty() {
            return Err(ParseError::missing(pos, "network prefix"));
        }
        if let Some(i) = digits.bytes().position(|c| !c.is_ascii_digit()) {
            return Err(ParseError::invalid_char_in(digits, i, "network prefix").offset_by(pos));
        }
        let reason = if max == 32 {
            "must be between 0 and 32"
        } else {
            "must be between 0 and 128"
        };
        let prefix_len = digits
            .parse::<u8>()
            .ok()
            .filter(|&n| n <= max)
            .ok_or_else(|| ParseError::out_of_range(pos, "network prefix", reason))?;

        let normalized = format!("{ip}/{prefix_len}");
        Ok(Self {
            ip,
            prefix_len,
            normalized,
        })
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the network address.
    #[must_use]
    pub const fn ip(&self) -> &Ip {
        &self.ip
    }

    /// Returns the prefix length in bits.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns the octets of the network address.
    #[must_use]
    pub fn octets(&self) -> Vec<u8> {
        self.ip.octets()
    }

    /// Returns true if the network address is private.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.ip.is_private()
    }
}

canonical_string!(IpCidr, display);
