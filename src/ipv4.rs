//! Dotted-quad IPv4 addresses.

use std::net::Ipv4Addr;

use crate::error::ParseError;

/// A validated IPv4 address in dotted-quad form.
///
/// Exactly four decimal fields, each 0-255, without leading zeros
/// (`"0"` itself is allowed).
///
/// # Examples
///
/// ```
/// use addr_canon::Ipv4;
///
/// let ip = Ipv4::parse("192.168.0.1").unwrap();
/// assert_eq!(ip.octets(), [192, 168, 0, 1]);
/// assert!(ip.is_private());
///
/// let err = Ipv4::parse("1.01.0.1").unwrap_err();
/// assert_eq!(err.position(), 1);
/// assert_eq!(err.to_string(), "[1]: leading zeros not allowed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ipv4 {
    octets: [u8; 4],
    normalized: String,
}

impl Ipv4 {
    /// Parses a dotted-quad IPv4 address.
    ///
    /// Errors report the index of the offending field, counting from 0; a
    /// wrong field count is reported at the index of the first missing or
    /// extra field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input does not have exactly 4 fields
    /// - A field is empty, not decimal, has a leading zero, or exceeds 255
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_fields(input).map_err(|(field, e)| e.at(field))
    }

    /// Like [`Ipv4::parse`], with errors at byte offsets into `input`.
    pub(crate) fn parse_located(input: &str) -> Result<Self, ParseError> {
        Self::parse_fields(input).map_err(|(_, e)| e)
    }

    fn parse_fields(input: &str) -> Result<Self, (usize, ParseError)> {
        if input.is_empty() {
            return Err((0, ParseError::missing(0, "IPv4 address")));
        }

        let mut octets = [0u8; 4];
        let mut count = 0;
        let mut start = 0;
        for field in input.split('.') {
            if count == octets.len() {
                return Err((
                    count,
                    ParseError::conflict(start - 1, "IPv4 address must have exactly 4 fields"),
                ));
            }
            octets[count] = parse_field(field).map_err(|e| (count, e.offset_by(start)))?;
            count += 1;
            start += field.len() + 1;
        }
        if count < octets.len() {
            return Err((
                count,
                ParseError::conflict(input.len(), "IPv4 address must have exactly 4 fields"),
            ));
        }

        Ok(Self {
            octets,
            normalized: input.to_owned(),
        })
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the four octets in network order.
    #[must_use]
    pub const fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Returns true for `0.0.0.0`.
    #[must_use]
    pub const fn is_unspecified(&self) -> bool {
        u32::from_be_bytes(self.octets) == 0
    }

    /// Returns true for `127.0.0.0/8`.
    #[must_use]
    pub const fn is_loopback(&self) -> bool {
        self.octets[0] == 127
    }

    /// Returns true for `10.0.0.0/8`, `172.16.0.0/12` and `192.168.0.0/16`.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        matches!(self.octets, [10, ..] | [172, 16..=31, ..] | [192, 168, ..])
    }
}

fn parse_field(field: &str) -> Result<u8, ParseError> {
    if field.is_empty() {
        return Err(ParseError::missing(0, "IPv4 field"));
    }
    if let Some(i) = field.bytes().position(|c| !c.is_ascii_digit()) {
        return Err(ParseError::invalid_char_in(field, i, "IPv4 address"));
    }
    if field.len() > 1 && field.starts_with('0') {
        return Err(ParseError::conflict(0, "leading zeros not allowed"));
    }
    field
        .parse::<u8>()
        .map_err(|_| ParseError::out_of_range(0, "IPv4 field", "must be between 0 and 255"))
}

impl From<Ipv4Addr> for Ipv4 {
    fn from(addr: Ipv4Addr) -> Self {
        Self {
            octets: addr.octets(),
            normalized: addr.to_string(),
        }
    }
}

impl From<&Ipv4> for Ipv4Addr {
    fn from(ip: &Ipv4) -> Self {
        Self::from(ip.octets)
    }
}

impl From<Ipv4> for Ipv4Addr {
    fn from(ip: Ipv4) -> Self {
        Self::from(ip.octets)
    }
}

canonical_string!(Ipv4, display);
