//! Constants for address validation and canonicalization.

/// DNS label maximum length.
pub const MAX_DNS_LABEL_LENGTH: usize = 63;

/// DNS domain maximum length.
pub const MAX_DNS_DOMAIN_LENGTH: usize = 253;

/// Token that replaces the password when an authority is displayed.
pub const PASSWORD_MASK: &str = "****";

/// Default port of the `http` scheme.
pub const HTTP_DEFAULT_PORT: u16 = 80;

/// Default port of the `https` scheme.
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Default port of the unencrypted ICE schemes (`stun`, `turn`).
pub const STUN_DEFAULT_PORT: u16 = 3478;

/// Default port of the encrypted ICE schemes (`stuns`, `turns`).
pub const STUNS_DEFAULT_PORT: u16 = 5349;

/// Scheme assumed for a gRPC target given as bare `host:port`.
pub const GRPC_DEFAULT_SCHEME: &str = "dns";

/// Scheme assumed for a file path given without one.
pub const FILE_SCHEME: &str = "file";

/// Host a `*4` local address binds to when none is given.
pub const IPV4_UNSPECIFIED_HOST: &str = "0.0.0.0";

/// Host a `*6` local address binds to when none is given.
pub const IPV6_UNSPECIFIED_HOST: &str = "[::]";
