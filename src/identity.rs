//! Client identity resolution.
//!
//! Progress is bucketed per client network address: proxy headers first,
//! then the peer socket, then a loopback fallback. This is a best-effort
//! key, not authentication; clients behind one NAT share an aggregate.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Derive a stable identity key from request metadata. Never fails.
pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
  // x-forwarded-for can contain multiple hops; the first entry is the client.
  if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
    if let Some(first) = forwarded.split(',').next() {
      let first = first.trim();
      if plausible_ip(first) {
        return first.to_string();
      }
    }
  }

  if let Some(real_ip) = header_str(headers, "x-real-ip") {
    let real_ip = real_ip.trim();
    if plausible_ip(real_ip) {
      return real_ip.to_string();
    }
  }

  if let Some(addr) = peer {
    return addr.ip().to_string();
  }

  // Fallback for local development.
  "127.0.0.1".to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

/// A header value is only trusted as an identity if it parses as an IP
/// address (or is a well-known local alias). Garbage falls through to the
/// next source instead of polluting the progress file.
fn plausible_ip(s: &str) -> bool {
  s.parse::<std::net::IpAddr>().is_ok() || s == "localhost"
}
