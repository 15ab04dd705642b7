//! Byte classes and percent-encoding normalization shared by every grammar.

use crate::error::{ParseError, ParseErrorKind};

pub(crate) const fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

pub(crate) const fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// `ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub(crate) const fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'~')
}

/// `"!" / "$" / "&" / "'" / "(" / ")" / "*" / "+" / "," / ";" / "="`
pub(crate) const fn is_sub_delim(c: u8) -> bool {
    matches!(
        c,
        b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}

/// Characters allowed unescaped in a path segment.
pub(crate) const fn is_path_char(c: u8) -> bool {
    is_unreserved(c) || is_sub_delim(c) || c == b':' || c == b'@'
}

/// Characters allowed unescaped in userinfo. `@` stays escaped so the
/// userinfo delimiter remains unambiguous.
pub(crate) const fn is_userinfo_char(c: u8) -> bool {
    is_unreserved(c) || is_sub_delim(c) || c == b':'
}

/// Characters allowed unescaped in a query or fragment.
pub(crate) const fn is_query_char(c: u8) -> bool {
    is_path_char(c) || c == b'/' || c == b'?'
}

pub(crate) const fn unhex(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decodes the `%XX` sequence at the start of `input`.
pub(crate) fn percent_decode(input: &[u8]) -> Result<u8, ParseError> {
    let invalid = || ParseError::new(0, ParseErrorKind::InvalidEncoding);
    let (Some(&hi), Some(&lo)) = (input.get(1), input.get(2)) else {
        return Err(invalid());
    };
    let hi = unhex(hi).ok_or_else(invalid)?;
    let lo = unhex(lo).ok_or_else(invalid)?;
    Ok((hi << 4) | lo)
}

/// Appends `input` to `out`, validating every byte against `allowed`.
///
/// A percent-encoded byte that `allowed` accepts is written decoded;
/// any other escape is kept with its hex digits uppercased. Error
/// positions are relative to `input`.
pub(crate) fn normalize_into(
    out: &mut String,
    input: &str,
    allowed: fn(u8) -> bool,
    component: &'static str,
) -> Result<(), ParseError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if allowed(c) {
            out.push(char::from(c));
            i += 1;
        } else if c == b'%' {
            let decoded = percent_decode(&bytes[i..]).map_err(|e| e.offset_by(i))?;
            if allowed(decoded) {
                out.push(char::from(decoded));
            } else {
                out.push('%');
                out.push(char::from(bytes[i + 1].to_ascii_uppercase()));
                out.push(char::from(bytes[i + 2].to_ascii_uppercase()));
            }
            i += 3;
        } else {
            return Err(ParseError::invalid_char_in(input, i, component));
        }
    }
    Ok(())
}

/// Normalizes `input` into a fresh string. See [`normalize_into`].
pub(crate) fn normalize(
    input: &str,
    allowed: fn(u8) -> bool,
    component: &'static str,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(input.len());
    normalize_into(&mut out, input, allowed, component)?;
    Ok(out)
}

/// Normalizes a `/`-separated path segment by segment.
///
/// An escaped `/` stays escaped so segment boundaries survive.
pub(crate) fn normalize_path(input: &str) -> Result<String, ParseError> {
    normalize_path_with(input, is_path_char)
}

/// Like [`normalize_path`] with a custom segment byte class.
pub(crate) fn normalize_path_with(
    input: &str,
    allowed: fn(u8) -> bool,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(input.len());
    let mut offset = 0;
    for (i, segment) in input.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }
        normalize_into(&mut out, segment, allowed, "path").map_err(|e| e.offset_by(offset))?;
        offset += segment.len() + 1;
    }
    Ok(out)
}
