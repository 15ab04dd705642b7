//! URL-style file paths.
//!
//! ```abnf
//! filepath = [ scheme ":" ] [ "//" ] path [ "?" query ] [ "#" fragment ]
//! ```
//!
//! Unlike a URL, the path may be relative (`file:./data`, `file:../data`)
//! and the `//` marker never introduces an authority: `file://./data` is
//! the relative path `./data`.

use crate::char_class::normalize_path;
use crate::constants::FILE_SCHEME;
use crate::error::ParseError;
use crate::url::{parse_scheme, parse_suffix};

/// A validated file path with a scheme.
///
/// Input without a valid scheme is a path under `file`. An empty path is
/// written as `/`, except that empty input means the current directory.
///
/// # Examples
///
/// ```
/// use addr_canon::Filepath;
///
/// let path = Filepath::parse("../data/%61.txt").unwrap();
/// assert_eq!(path.as_str(), "file:../data/a.txt");
/// assert_eq!(path.path(), "../data/a.txt");
///
/// let path = Filepath::parse("FILE:///etc/hosts").unwrap();
/// assert_eq!(path.as_str(), "file:///etc/hosts");
/// assert_eq!(path.path(), "/etc/hosts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filepath {
    scheme: String,
    hierarchical: bool,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    normalized: String,
}

impl Filepath {
    /// Parses a file path.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the path, query or fragment has an invalid
    /// character or percent-encoding.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Ok(Self::assemble(
                FILE_SCHEME.to_owned(),
                false,
                ".".to_owned(),
                None,
                None,
            ));
        }

        let scheme = input
            .split_once(':')
            .and_then(|(scheme, _)| parse_scheme(scheme).ok().map(|s| (s, scheme.len() + 1)));
        let (scheme, offset) = scheme.unwrap_or_else(|| {
            tracing::trace!(scheme = FILE_SCHEME, "no scheme, reading input as a file path");
            (FILE_SCHEME.to_owned(), 0)
        });

        let rest = &input[offset..];
        let (hierarchical, rest, offset) = match rest.strip_prefix("//") {
            Some(rest) => (true, rest, offset + 2),
            None => (false, rest, offset),
        };

        let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
        let path = normalize_path(&rest[..path_end]).map_err(|e| e.offset_by(offset))?;
        let (query, fragment, _) =
            parse_suffix(&rest[path_end..]).map_err(|e| e.offset_by(offset + path_end))?;

        Ok(Self::assemble(scheme, hierarchical, path, query, fragment))
    }

    fn assemble(
        scheme: String,
        hierarchical: bool,
        path: String,
        query: Option<String>,
        fragment: Option<String>,
    ) -> Self {
        let path = if path.is_empty() { "/".to_owned() } else { path };
        let mut normalized = format!("{scheme}:");
        if hierarchical {
            normalized.push_str("//");
        }
        normalized.push_str(&path);
        if let Some(query) = &query {
            normalized.push('?');
            normalized.push_str(query);
        }
        if let Some(fragment) = &fragment {
            normalized.push('#');
            normalized.push_str(fragment);
        }
        Self {
            scheme,
            hierarchical,
            path,
            query,
            fragment,
            normalized,
        }
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns the lowercase scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns true if the scheme is followed by `//`.
    #[must_use]
    pub const fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    /// Returns the path; never empty.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the path starts with `/`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with('/')
    }

    /// Returns the query without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment without the leading `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns a new file path with the given path, keeping scheme, query
    /// and fragment.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the path has an invalid character or
    /// percent-encoding, or starts with `//` where it would be read back
    /// as the `//` marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use addr_canon::Filepath;
    ///
    /// let path = Filepath::parse("file:/a?x#y").unwrap();
    /// assert_eq!(path.with_path("./b").unwrap().as_str(), "file:./b?x#y");
    /// ```
    pub fn with_path(&self, path: &str) -> Result<Self, ParseError> {
        if !self.hierarchical && path.starts_with("//") {
            return Err(ParseError::conflict(
                0,
                "path must not start with '//' without the '//' marker",
            ));
        }
        let path = normalize_path(path)?;
        Ok(Self::assemble(
            self.scheme.clone(),
            self.hierarchical,
            path,
            self.query.clone(),
            self.fragment.clone(),
        ))
    }
}

canonical_string!(Filepath, display);
