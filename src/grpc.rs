//! gRPC targets.
//!
//! A target is either a URL naming a resolver scheme (`dns:///grpc.io:443`,
//! `unix:///run/app.sock`, `xds:///wallet.example`, `ipv4:10.0.0.1:50051`)
//! or a bare `host:port`, which resolves through `dns`.

use std::fmt;

use crate::authority::{Authority, parse_port};
use crate::char_class::is_path_char;
use crate::constants::GRPC_DEFAULT_SCHEME;
use crate::error::ParseError;
use crate::host::Host;
use crate::local::{self, Local, LocalLike, TcpUnixLocal};
use crate::url::{self, Url, UrlLike};

/// A validated gRPC target.
///
/// The `dns`, `unix` and `xds` schemes are always written with the `//`
/// marker. Any other valid scheme is accepted as written.
///
/// # Examples
///
/// ```
/// use addr_canon::Grpc;
///
/// let target = Grpc::parse("grpc.io:50051").unwrap();
/// assert_eq!(target.as_str(), "dns:///grpc.io:50051");
/// assert_eq!(target.host().map(ToString::to_string).as_deref(), Some("grpc.io"));
/// assert_eq!(target.port(), Some(50051));
///
/// let target = Grpc::parse("unix:/run/app.sock").unwrap();
/// assert_eq!(target.as_str(), "unix:///run/app.sock");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grpc {
    url: Url,
    target: Option<Authority>,
    target_in_path: bool,
}

impl Grpc {
    /// Parses a gRPC target.
    ///
    /// Input without a scheme, or whose text after the first `:` is a
    /// port, is read as `dns:///<input>`. Error positions always refer to
    /// the caller's input.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is empty or not a valid URL.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::missing(0, "gRPC target"));
        }
        if !needs_default_scheme(input) {
            let (url, _) = Url::parse_located_with(input, is_target_char)?;
            return Ok(Self::from_url(url));
        }

        tracing::debug!(
            target_name = input,
            scheme = GRPC_DEFAULT_SCHEME,
            "no scheme in gRPC target, using the default"
        );
        let prefix = format!("{GRPC_DEFAULT_SCHEME}:///");
        let (url, _) = Url::parse_located_with(&format!("{prefix}{input}"), is_target_char)
            .map_err(|e| e.before_prefix(prefix.len()))?;
        Ok(Self::from_url(url))
    }

    fn from_url(url: Url) -> Self {
        let url = if matches!(url.scheme(), "dns" | "unix" | "xds") && !url.is_hierarchical() {
            url.with_hierarchical(true)
        } else {
            url
        };

        let endpoint = url
            .path()
            .strip_prefix('/')
            .and_then(|p| p.split('/').next())
            .filter(|p| !p.is_empty());
        let (target, target_in_path) = match endpoint {
            _ if url.scheme() == "unix" => (None, false),
            Some(endpoint) => (Authority::parse(endpoint).ok(), true),
            None => (url.authority().cloned(), false),
        };

        Self {
            url,
            target,
            target_in_path,
        }
    }

    /// Builds `dns:///<host>:<port>`.
    fn dns(target: Authority) -> Result<Self, ParseError> {
        let url = Url::from_authority(GRPC_DEFAULT_SCHEME, None)
            .with_path_of(&format!("/{}", target.as_str()), is_target_char)?;
        Ok(Self::from_url(url))
    }

    /// Returns the canonical string, password included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the resolver scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns the `host[:port]` the target resolves.
    ///
    /// For `dns:///name:port` this is the endpoint in the path, not the
    /// DNS server authority. `None` for Unix sockets and for targets whose
    /// endpoint is not a `host[:port]`.
    #[must_use]
    pub const fn target(&self) -> Option<&Authority> {
        self.target.as_ref()
    }

    /// Returns the host of the target.
    #[must_use]
    pub fn host(&self) -> Option<&Host> {
        self.target.as_ref().and_then(Authority::host)
    }

    /// Returns the port of the target.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.target.as_ref().and_then(Authority::port)
    }

    /// Returns the socket path of a `unix` target.
    #[must_use]
    pub fn socket_path(&self) -> Option<&str> {
        (self.url.scheme() == "unix").then(|| self.url.path())
    }

    fn replacing_target(&self, target: &Authority) -> Result<Self, ParseError> {
        let url = self
            .url
            .with_path_of(&format!("/{}", target.as_str()), is_target_char)?;
        Ok(Self::from_url(url))
    }
}

/// Path bytes of a target: a bracketed IPv6 endpoint may follow `dns:///`.
const fn is_target_char(c: u8) -> bool {
    is_path_char(c) || c == b'[' || c == b']'
}

fn needs_default_scheme(input: &str) -> bool {
    if input.contains("://") {
        return false;
    }
    if input.starts_with('[') {
        return true;
    }
    match input.split_once(':') {
        None => true,
        Some((_, rest)) => {
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            parse_port(&rest[..end]).is_ok()
        }
    }
}

impl url::sealed::Sealed for Grpc {}

impl UrlLike for Grpc {
    fn as_url(&self) -> &Url {
        &self.url
    }

    fn try_from_url(url: Url) -> Result<Self, ParseError> {
        Ok(Self::from_url(url))
    }

    fn with_host(&self, host: &str) -> Result<Self, ParseError> {
        match &self.target {
            Some(target) if self.target_in_path => self.replacing_target(&target.with_host(host)?),
            _ => Self::try_from_url(self.url.with_host(host)?),
        }
    }

    fn with_port(&self, port: u16) -> Result<Self, ParseError> {
        match &self.target {
            Some(target) if self.target_in_path => self.replacing_target(&target.with_port(port)),
            _ => Self::try_from_url(self.url.with_port(port)),
        }
    }
}

impl fmt::Display for Grpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

canonical_string!(Grpc);

/// The local address a gRPC server listens on: TCP or a Unix socket.
///
/// # Examples
///
/// ```
/// use addr_canon::GrpcLocal;
///
/// let local = GrpcLocal::parse("tcp6:[::]:50051").unwrap();
/// assert_eq!(local.as_url().unwrap().as_str(), "dns:///[::1]:50051");
///
/// let local = GrpcLocal::parse("unix:/run/app.sock").unwrap();
/// assert_eq!(local.as_url().unwrap().as_str(), "unix:///run/app.sock");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrpcLocal(TcpUnixLocal);

impl GrpcLocal {
    /// Parses a listen address. See [`TcpUnixLocal::parse`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the address is not a valid TCP or Unix
    /// socket address.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        TcpUnixLocal::parse(input).map(Self)
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the target a client on this machine dials.
    ///
    /// Unspecified hosts become loopback; Unix sockets map to
    /// `unix://<path>`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for a Unix socket whose path is relative or
    /// not representable in a URL path.
    pub fn as_url(&self) -> Result<Grpc, ParseError> {
        let local = self.0.as_local();
        match local.loopback() {
            Some((host, port)) => Grpc::dns(Authority::from_parts(None, Some(host), Some(port))),
            None => {
                let path = local.path().unwrap_or_default();
                let url = Url::from_authority("unix", None).with_path(path)?;
                Grpc::try_from_url(url)
            }
        }
    }
}

impl local::sealed::Sealed for GrpcLocal {}

impl LocalLike for GrpcLocal {
    fn as_local(&self) -> &Local {
        self.0.as_local()
    }

    fn try_from_local(local: Local) -> Result<Self, ParseError> {
        TcpUnixLocal::try_from_local(local).map(Self)
    }
}

canonical_string!(GrpcLocal, display);
