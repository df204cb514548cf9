use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use hmac::{Hmac, Mac};
use log::{debug, trace};
use regex::Regex;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Calculate the base64-encoded HMAC-SHA256 digest of `data` under the shared `secret`.
///
/// The digest is computed over the exact bytes passed in; an empty body is signed as zero-length input, not
/// skipped. This is what the platform computes over the raw request body when it signs a delivery.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take a key of any size");
    mac.update(data);
    base64::encode(mac.finalize().into_bytes())
}

/// Compare a provided signature against the expected digest in constant time, so the comparison leaks no timing
/// information about the expected value. Inputs of unequal length compare as false.
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, use_x_forwarded_for: bool, use_forwarded: bool) -> Option<IpAddr> {
    // Collect peer IP from x-forwarded-for, or forwarded headers _if_ `use_nnn` has been set to true
    // in the configuration. Otherwise, use the peer address from the connection info.
    let mut result = None;
    if use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result =
            req.headers().get("X-Forwarded-For").and_then(|v| v.to_str().ok()).and_then(|s| IpAddr::from_str(s).ok());
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        let re = Regex::new(r#"for=(?P<ip>[^;]+)"#).unwrap();
        result = req
            .headers()
            .get("Forwarded")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| re.captures(v))
            .and_then(|caps| caps.name("ip"))
            .map(|m| m.as_str())
            .and_then(|s| IpAddr::from_str(s).ok());
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.connection_info().peer_addr().map(|a| a.to_string());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr.and_then(|s| IpAddr::from_str(&s).ok())
    })
}

#[cfg(test)]
mod test {
    use super::*;

    // Digest computed independently: HMAC-SHA256 over the exact bytes of `{"x":1}` with key `abc123`.
    const KNOWN_DIGEST: &str = "oZiE9o9pDtWBC9PSMOtmyHRDAm+DyMdnoIQc3fU+soE=";

    #[test]
    fn known_vector() {
        assert_eq!(calculate_hmac("abc123", br#"{"x":1}"#), KNOWN_DIGEST);
    }

    #[test]
    fn empty_payload_is_hashed_as_zero_length_input() {
        assert_eq!(calculate_hmac("abc123", b""), "bS2fxhAzf4E6G4WGnsIUEplAhgVDrQQwjYc1f2wBM/Y=");
    }

    #[test]
    fn a_signature_under_the_right_secret_matches() {
        let payload = b"some opaque notification body";
        let signature = calculate_hmac("verifier-token", payload);
        assert!(signatures_match(&calculate_hmac("verifier-token", payload), &signature));
    }

    #[test]
    fn a_signature_under_a_different_secret_does_not_match() {
        let payload = br#"{"x":1}"#;
        let signature = calculate_hmac("abc124", payload);
        assert!(!signatures_match(&calculate_hmac("abc123", payload), &signature));
    }

    #[test]
    fn an_empty_signature_fails_closed() {
        assert!(!signatures_match(KNOWN_DIGEST, ""));
    }

    #[test]
    fn signatures_of_unequal_length_do_not_match() {
        assert!(!signatures_match(KNOWN_DIGEST, &KNOWN_DIGEST[..20]));
    }
}
