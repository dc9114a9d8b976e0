//! Client identity derived from proxy headers.

use axum::http::HeaderMap;

/// Bucket used when no usable identity header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Key prefix for login throttling.
const LOGIN_KEY_PREFIX: &str = "auth:";

/// Returns the client address as reported by the reverse proxy.
///
/// Uses the first entry of `x-forwarded-for`, then `x-real-ip`. Missing,
/// empty, or non-UTF-8 values fall through to [`UNKNOWN_CLIENT`].
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Rate limit key for a login attempt from these headers.
pub fn login_rate_limit_key(headers: &HeaderMap) -> String {
    format!("{LOGIN_KEY_PREFIX}{}", client_ip(headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_first_forwarded_entry_wins() {
        let h = headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(client_ip(&h), "203.0.113.7");
        assert_eq!(login_rate_limit_key(&h), "auth:203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let h = headers(&[("x-forwarded-for", "  "), ("x-real-ip", "198.51.100.4")]);
        assert_eq!(client_ip(&h), "198.51.100.4");
    }

    #[test]
    fn test_unknown_bucket() {
        assert_eq!(client_ip(&HeaderMap::new()), UNKNOWN_CLIENT);

        let mut h = HeaderMap::new();
        h.insert(
            "x-forwarded-for",
            HeaderValue::from_bytes(b"\xff\xfe").unwrap(),
        );
        assert_eq!(login_rate_limit_key(&h), "auth:unknown");
    }
}
