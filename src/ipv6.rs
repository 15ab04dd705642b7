//! IPv6 addresses and their RFC 5952 canonical text form.
//!
//! Parsing accepts every RFC 4291 text form: full eight-group notation,
//! a single `::` compression, and an IPv4 dotted tail in the IPv4-mapped
//! position. The canonical form:
//!
//! - writes hex digits in lowercase without leading zeros,
//! - replaces the longest run of two or more zero groups with `::`, picking
//!   the leftmost run on ties,
//! - writes IPv4-mapped addresses as `::ffff:a.b.c.d`.

use std::fmt::{self, Write as _};
use std::net::Ipv6Addr;

use crate::error::ParseError;
use crate::ipv4::Ipv4;

const MAPPED_PREFIX: [u16; 6] = [0, 0, 0, 0, 0, 0xffff];
const MAX_FIELDS: usize = 9;

/// A validated IPv6 address in canonical form.
///
/// The stored form is never bracketed; [`Host`](crate::Host) adds brackets
/// when the address is embedded in an authority.
///
/// # Examples
///
/// ```
/// use addr_canon::Ipv6;
///
/// let ip = Ipv6::parse("2001:0DB8:0:0:0:0:0:1").unwrap();
/// assert_eq!(ip.as_str(), "2001:db8::1");
///
/// let ip = Ipv6::parse("[0:0:0:0:0:ffff:192.0.2.128]").unwrap();
/// assert_eq!(ip.as_str(), "::ffff:192.0.2.128");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ipv6 {
    segments: [u16; 8],
    normalized: String,
}

impl Ipv6 {
    /// Parses an IPv6 address, optionally wrapped in brackets.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty or an opening bracket is not closed
    /// - The address has fewer than 2 colons or more than 8 blocks
    /// - A single `:` starts or ends the address, or `::` appears twice
    /// - A block is longer than 4 hex digits or contains a non-hex byte
    /// - A dotted tail is malformed or outside the IPv4-mapped position
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (body, offset) = match input.strip_prefix('[') {
            Some(rest) => {
                let body = rest
                    .strip_suffix(']')
                    .ok_or_else(|| ParseError::conflict(input.len(), "missing closing ']'"))?;
                (body, 1)
            }
            None => (input, 0),
        };

        let segments = parse_segments(body).map_err(|e| e.offset_by(offset))?;
        Ok(Self::from_segments(segments))
    }

    fn from_segments(segments: [u16; 8]) -> Self {
        Self {
            segments,
            normalized: Canonical(&segments).to_string(),
        }
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the eight 16-bit groups.
    #[must_use]
    pub const fn segments(&self) -> [u16; 8] {
        self.segments
    }

    /// Returns the sixteen octets in network order.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Ipv6;
    ///
    /// let ip = Ipv6::parse("::ffff:192.0.2.128").unwrap();
    /// assert_eq!(&ip.octets()[10..], &[0xff, 0xff, 192, 0, 2, 128]);
    /// ```
    #[must_use]
    pub fn octets(&self) -> [u8; 16] {
        let mut octets = [0u8; 16];
        for (chunk, segment) in octets.chunks_exact_mut(2).zip(self.segments) {
            chunk.copy_from_slice(&segment.to_be_bytes());
        }
        octets
    }

    /// Returns the embedded IPv4 address of an IPv4-mapped address.
    #[must_use]
    pub fn to_ipv4_mapped(&self) -> Option<Ipv4> {
        if self.segments[..6] != MAPPED_PREFIX {
            return None;
        }
        let [.., a, b, c, d] = self.octets();
        Some(Ipv4::from(std::net::Ipv4Addr::new(a, b, c, d)))
    }

    /// Returns true for `::`.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        self.segments == [0; 8]
    }

    /// Returns true for `::1`.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        self.segments == [0, 0, 0, 0, 0, 0, 0, 1]
    }

    /// Returns true for unique local addresses (`fc00::/7`).
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.segments[0] & 0xfe00 == 0xfc00
    }
}

/// Parses the unbracketed address into its eight groups.
fn parse_segments(s: &str) -> Result<[u16; 8], ParseError> {
    if s.is_empty() {
        return Err(ParseError::missing(0, "IPv6 address"));
    }

    let mut fields = [(0usize, ""); MAX_FIELDS];
    let mut count = 0;
    let mut start = 0;
    for field in s.split(':') {
        if count == MAX_FIELDS {
            return Err(ParseError::conflict(start - 1, "must have at most 8 blocks"));
        }
        fields[count] = (start, field);
        count += 1;
        start += field.len() + 1;
    }
    let fields = &fields[..count];

    if count < 3 {
        return Err(ParseError::conflict(s.len(), "must have at least 2 colons"));
    }
    if fields[0].1.is_empty() && !fields[1].1.is_empty() {
        return Err(ParseError::conflict(0, "single ':' at the beginning"));
    }
    if fields[count - 1].1.is_empty() && !fields[count - 2].1.is_empty() {
        return Err(ParseError::conflict(s.len() - 1, "single ':' at the end"));
    }

    let mut groups = [0u16; 8];
    let mut n = 0;
    let mut gap = None;
    let mut dotted = None;
    for (i, &(offset, field)) in fields.iter().enumerate() {
        if field.is_empty() {
            // The leading and trailing `::` span two empty fields.
            let is_lead = i == 0;
            let is_trail = i == count - 1 && fields[i - 1].1.is_empty();
            if is_lead || is_trail {
                continue;
            }
            if gap.is_some() {
                return Err(ParseError::conflict(
                    offset.saturating_sub(1),
                    "only one '::' allowed",
                ));
            }
            gap = Some(n);
            continue;
        }

        if field.contains('.') {
            if i != count - 1 || n > 6 {
                return Err(ParseError::conflict(
                    offset,
                    "IPv4 tail must be the last 32 bits",
                ));
            }
            let ipv4 = Ipv4::parse_located(field).map_err(|e| {
                ParseError::conflict(offset, "invalid IPv4-mapped IPv6 address")
                    .with_cause(e.offset_by(offset))
            })?;
            let [a, b, c, d] = ipv4.octets();
            groups[n] = u16::from_be_bytes([a, b]);
            groups[n + 1] = u16::from_be_bytes([c, d]);
            n += 2;
            dotted = Some(offset);
            continue;
        }

        if n == groups.len() {
            return Err(ParseError::conflict(offset, "must have at most 8 blocks"));
        }
        groups[n] = parse_block(field).map_err(|e| e.offset_by(offset))?;
        n += 1;
    }

    let mut segments = [0u16; 8];
    match gap {
        Some(at) => {
            if n == groups.len() {
                return Err(ParseError::conflict(0, "must have at most 8 blocks"));
            }
            let tail = n - at;
            segments[..at].copy_from_slice(&groups[..at]);
            segments[8 - tail..].copy_from_slice(&groups[at..n]);
        }
        None => {
            if n != groups.len() {
                return Err(ParseError::conflict(
                    s.len(),
                    "must have 8 blocks when '::' is absent",
                ));
            }
            segments = groups;
        }
    }

    if let Some(offset) = dotted {
        if segments[..6] != MAPPED_PREFIX {
            return Err(ParseError::conflict(
                offset,
                "IPv4 tail is only allowed in an IPv4-mapped address",
            ));
        }
    }

    Ok(segments)
}

fn parse_block(block: &str) -> Result<u16, ParseError> {
    if block.len() > 4 {
        return Err(ParseError::out_of_range(
            0,
            "IPv6 block",
            "must be at most 4 hex digits",
        ));
    }
    let mut value = 0u16;
    for (i, c) in block.bytes().enumerate() {
        let digit = char::from(c)
            .to_digit(16)
            .ok_or_else(|| ParseError::invalid_char_in(block, i, "IPv6 address"))?;
        value = (value << 4) | u16::try_from(digit).unwrap_or_default();
    }
    Ok(value)
}

/// Returns the start and length of the longest run of zero groups.
///
/// Runs shorter than 2 are ignored; the leftmost run wins ties.
fn longest_zero_run(segments: &[u16; 8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < segments.len() {
        if segments[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < segments.len() && segments[i] == 0 {
            i += 1;
        }
        let len = i - start;
        if len >= 2 && best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }
    best
}

struct Canonical<'a>(&'a [u16; 8]);

impl fmt::Display for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self.0;
        if segments[..6] == MAPPED_PREFIX {
            let [a, b] = segments[6].to_be_bytes();
            let [c, d] = segments[7].to_be_bytes();
            return write!(f, "::ffff:{a}.{b}.{c}.{d}");
        }

        let write_groups = |f: &mut fmt::Formatter<'_>, groups: &[u16]| -> fmt::Result {
            for (i, group) in groups.iter().enumerate() {
                if i > 0 {
                    f.write_char(':')?;
                }
                write!(f, "{group:x}")?;
            }
            Ok(())
        };

        match longest_zero_run(segments) {
            Some((start, len)) => {
                write_groups(f, &segments[..start])?;
                f.write_str("::")?;
                write_groups(f, &segments[start + len..])
            }
            None => write_groups(f, segments),
        }
    }
}

impl From<Ipv6Addr> for Ipv6 {
    fn from(addr: Ipv6Addr) -> Self {
        Self::from_segments(addr.segments())
    }
}

impl From<&Ipv6> for Ipv6Addr {
    fn from(ip: &Ipv6) -> Self {
        Self::from(ip.segments)
    }
}

impl From<Ipv6> for Ipv6Addr {
    fn from(ip: Ipv6) -> Self {
        Self::from(ip.segments)
    }
}

canonical_string!(Ipv6, display);
