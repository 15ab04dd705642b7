//! Convenient re-exports for glob imports.
//!
//! Brings every address type into scope together with the [`UrlLike`] and
//! [`LocalLike`] traits, whose builder methods are otherwise not callable:
//!
//! ```rust
//! use addr_canon::prelude::*;
//!
//! let http = Http::parse("http://example.com:8080").unwrap();
//! assert_eq!(http.with_port(80).unwrap().as_str(), "http://example.com");
//!
//! let local = TcpLocal::parse(":8080").unwrap();
//! assert_eq!(local.network(), Network::Tcp);
//! ```

pub use crate::{
    // Hosts
    Authority, Domain, Host, Ip, IpCidr, IpPort, Ipv4, Ipv6,
    // URLs
    Filepath, Grpc, Http, Ice, QueryParams, Transport, Url, UrlLike,
    // Local addresses
    GrpcLocal, HttpLocal, IceLocal, IpFamily, Local, LocalLike, Network, TcpLocal, TcpUdpLocal,
    TcpUnixLocal, UdpLocal, UnixLocal,
    // Errors
    ParseError, ParseErrorKind,
};
