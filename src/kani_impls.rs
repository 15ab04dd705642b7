//! Kani Arbitrary implementations and proof harnesses for property verification.
//!
//! # Usage
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::authority::parse_port;
use crate::{Ipv4, Ipv6};

impl kani::Arbitrary for Ipv4 {
    fn any() -> Self {
        let octets: [u8; 4] = kani::any();
        Ipv4::from(Ipv4Addr::from(octets))
    }
}

impl kani::Arbitrary for Ipv6 {
    fn any() -> Self {
        let segments: [u16; 8] = kani::any();
        Ipv6::from(Ipv6Addr::from(segments))
    }
}

// ============================================================================
// Kani Proof Harnesses
// ============================================================================

/// Proof: the dotted form of any address parses back to the same octets
#[kani::proof]
#[kani::unwind(20)]
fn proof_ipv4_roundtrip() {
    let ip: Ipv4 = kani::any();
    let reparsed = Ipv4::parse(ip.as_str()).expect("canonical should parse");
    assert_eq!(reparsed.octets(), ip.octets());
}

/// Proof: the canonical IPv6 text is a fixed point of parsing
#[kani::proof]
#[kani::unwind(45)]
fn proof_ipv6_canonical_fixed_point() {
    let ip: Ipv6 = kani::any();
    let reparsed = Ipv6::parse(ip.as_str()).expect("canonical should parse");
    assert_eq!(reparsed.as_str(), ip.as_str());
    assert_eq!(reparsed.segments(), ip.segments());
}

/// Proof: every port number survives printing and parsing
#[kani::proof]
#[kani::unwind(8)]
fn proof_port_roundtrip() {
    let port: u16 = kani::any();
    assert_eq!(parse_port(&port.to_string()), Ok(port));
}
