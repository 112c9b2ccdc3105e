//! Request inspection helpers for services sitting behind proxies.

use reqwest::header::HeaderMap;
use std::net::IpAddr;

const UNKNOWN: &str = "unknown";
const LOOPBACK: &str = "127.0.0.1";

/// Headers consulted before the socket address, in order.
const FORWARD_HEADERS: [&str; 3] = ["x-forwarded-for", "proxy-client-ip", "wl-proxy-client-ip"];
const REAL_IP_HEADER: &str = "x-real-ip";

/// `true` for missing, empty, `unknown` (any case) and loopback values.
#[must_use]
pub fn is_invalid_ip(ip: Option<&str>) -> bool {
    ip.is_none_or(|ip| ip.is_empty() || ip.eq_ignore_ascii_case(UNKNOWN) || ip == LOOPBACK)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

/// Best guess at the originating client address.
///
/// Tries the proxy headers (first hop of `X-Forwarded-For`), then `remote`, then `X-Real-IP`,
/// and falls back to `"unknown"`.
#[must_use]
pub fn client_ip(headers: &HeaderMap, remote: Option<IpAddr>) -> String {
    let forwarded = FORWARD_HEADERS.iter().map(|name| {
        header(headers, name).map(|v| v.split(',').next().unwrap_or(v).trim().to_owned())
    });
    let remote = std::iter::once(remote.map(|ip| ip.to_string()));
    let real_ip = std::iter::once(header(headers, REAL_IP_HEADER).map(str::to_owned));

    forwarded
        .chain(remote)
        .chain(real_ip)
        .flatten()
        .find(|ip| !is_invalid_ip(Some(ip.as_str())))
        .unwrap_or_else(|| UNKNOWN.to_owned())
}

/// `scheme://host:port/context`.
#[must_use]
pub fn base_path(scheme: &str, host: &str, port: u16, context: &str) -> String {
    format!("{scheme}://{host}:{port}{context}")
}

/// `scheme://host/context`.
#[must_use]
pub fn base_path_without_port(scheme: &str, host: &str, context: &str) -> String {
    format!("{scheme}://{host}{context}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_invalid_ips() {
        assert!(is_invalid_ip(None));
        assert!(is_invalid_ip(Some("")));
        assert!(is_invalid_ip(Some("UNKNOWN")));
        assert!(is_invalid_ip(Some("127.0.0.1")));
        assert!(!is_invalid_ip(Some("10.0.0.1")));
    }

    #[test]
    fn test_forwarded_first_hop_wins() {
        let map = headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.2"), ("x-real-ip", "10.0.0.3")]);
        assert_eq!(client_ip(&map, Some([10, 0, 0, 4].into())), "203.0.113.9");
    }

    #[test]
    fn test_proxy_headers_then_remote_then_real_ip() {
        let map = headers(&[("x-forwarded-for", "unknown"), ("wl-proxy-client-ip", "198.51.100.7")]);
        assert_eq!(client_ip(&map, None), "198.51.100.7");

        let map = headers(&[("x-real-ip", "198.51.100.8")]);
        assert_eq!(client_ip(&map, Some([192, 0, 2, 1].into())), "192.0.2.1");
        assert_eq!(client_ip(&map, Some([127, 0, 0, 1].into())), "198.51.100.8");
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn test_base_paths() {
        assert_eq!(base_path("https", "example.com", 8443, "/app"), "https://example.com:8443/app");
        assert_eq!(base_path_without_port("http", "example.com", ""), "http://example.com");
    }
}
