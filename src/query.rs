//! Query parameter iteration.

use std::iter::FusedIterator;

/// An iterator over the `key=value` pairs of a query string.
///
/// Pairs are split on `&` and then on the first `=`, following the
/// `application/x-www-form-urlencoded` splitting rules. Empty pairs are
/// skipped and a pair without `=` yields an empty value. Keys and values
/// are returned as written; no percent-decoding is applied.
///
/// The iterator borrows the query and is cheap to clone, so iteration can
/// be restarted at any point.
///
/// # Examples
///
/// ```
/// use addr_canon::QueryParams;
///
/// let params: Vec<_> = QueryParams::new("&&&foo=bar&&&baz&&&").collect();
/// assert_eq!(params, [("foo", "bar"), ("baz", "")]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryParams<'a> {
    rest: &'a str,
}

impl<'a> QueryParams<'a> {
    /// Creates an iterator over a query string, without the leading `?`.
    #[must_use]
    pub const fn new(query: &'a str) -> Self {
        Self { rest: query }
    }

    /// Returns the value of the first pair with the given key.
    #[must_use]
    pub fn get(mut self, key: &str) -> Option<&'a str> {
        self.find_map(|(k, v)| (k == key).then_some(v))
    }
}

impl<'a> Iterator for QueryParams<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (pair, rest) = self.rest.split_once('&').unwrap_or((self.rest, ""));
            self.rest = rest;
            if !pair.is_empty() {
                return Some(pair.split_once('=').unwrap_or((pair, "")));
            }
        }
        None
    }
}

impl FusedIterator for QueryParams<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &str) -> Vec<(&str, &str)> {
        QueryParams::new(query).collect()
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert!(pairs("").is_empty());
        assert!(pairs("&").is_empty());
        assert!(pairs("&&").is_empty());
    }

    #[test]
    fn empty_keys_and_values() {
        assert_eq!(pairs("="), [("", "")]);
        assert_eq!(pairs("k"), [("k", "")]);
        assert_eq!(pairs("=v"), [("", "v")]);
        assert_eq!(pairs("k=v=w"), [("k", "v=w")]);
    }

    #[test]
    fn multiple_pairs() {
        assert_eq!(
            pairs("&&&foo=bar&&&baz=qux&&&"),
            [("foo", "bar"), ("baz", "qux")]
        );
    }

    #[test]
    fn restartable() {
        let params = QueryParams::new("a=1&b=2");
        let mut first = params.clone();
        assert_eq!(first.next(), Some(("a", "1")));
        assert_eq!(params.count(), 2);
    }

    #[test]
    fn fused_after_end() {
        let mut params = QueryParams::new("a");
        assert!(params.next().is_some());
        assert!(params.next().is_none());
        assert!(params.next().is_none());
    }

    #[test]
    fn get_first_match() {
        let params = QueryParams::new("a=1&b=2&a=3");
        assert_eq!(params.clone().get("a"), Some("1"));
        assert_eq!(params.get("c"), None);
    }
}
