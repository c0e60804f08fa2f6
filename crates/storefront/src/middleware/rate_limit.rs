//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the cart mutation endpoints are limited; catalog pages are reads.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Single-value proxy headers carrying the client IP, most trusted first.
const CLIENT_IP_HEADERS: [&str; 2] = ["cf-connecting-ip", "x-real-ip"];

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor for the client IP.
///
/// Proxy headers are only read when `trust_proxy` is set, i.e. the
/// storefront sits behind a reverse proxy that overwrites them. Otherwise
/// the peer address recorded by `into_make_service_with_connect_info` is
/// the key.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy
            && let Some(ip) = proxied_ip(req.headers())
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Client IP as reported by a trusted proxy.
///
/// X-Forwarded-For is a chain the client can prefill; only the last hop,
/// appended by our own proxy, is used.
fn proxied_ip(headers: &HeaderMap) -> Option<IpAddr> {
    CLIENT_IP_HEADERS
        .into_iter()
        .find_map(|name| header_str(headers, name).and_then(parse_ip))
        .or_else(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|chain| chain.rsplit(',').next())
                .and_then(parse_ip)
        })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(s: &str) -> Option<IpAddr> {
    s.trim().parse().ok()
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for cart mutations: ~60 requests per minute per IP.
///
/// Configuration: 1 request per second (replenish), burst of 30.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn cart_rate_limiter(trust_proxy: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy))
        .per_second(1)
        .burst_size(30)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(30) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/cart/ajax/add");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    fn with_peer(mut req: Request<()>, peer: &str) -> Request<()> {
        let peer: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        req
    }

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor::new(true);
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor::new(false);

    #[test]
    fn test_cloudflare_header_wins() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.7"),
        ]);
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_uses_last_hop() {
        let req = request(&[("x-forwarded-for", "1.2.3.4, 198.51.100.2")]);
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "198.51.100.2");
    }

    #[test]
    fn test_spoofed_forwarded_for_does_not_change_key() {
        let first = request(&[("x-forwarded-for", "1.1.1.1, 198.51.100.2")]);
        let second = request(&[("x-forwarded-for", "9.9.9.9, 198.51.100.2")]);
        assert_eq!(
            BEHIND_PROXY.extract(&first).unwrap(),
            BEHIND_PROXY.extract(&second).unwrap()
        );
    }

    #[test]
    fn test_direct_ignores_proxy_headers() {
        let req = with_peer(
            request(&[
                ("cf-connecting-ip", "203.0.113.7"),
                ("x-forwarded-for", "198.51.100.2"),
            ]),
            "192.0.2.9:5555",
        );
        let ip = DIRECT.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.9");
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let req = with_peer(request(&[("x-real-ip", "not-an-ip")]), "192.0.2.9:5555");
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.9");
    }

    #[test]
    fn test_no_source_is_an_error() {
        let req = request(&[]);
        assert!(BEHIND_PROXY.extract(&req).is_err());
        assert!(DIRECT.extract(&req).is_err());
    }
}
