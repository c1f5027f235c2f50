//! Scheme and host extraction from incoming requests.

use crate::AppError;
use axum::http::{HeaderMap, Uri, header, uri::Scheme};

/// Header set by TLS-terminating proxies to report the client-facing scheme.
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Returns the host to embed in a short URL.
///
/// Uses the `Host` header verbatim, port included. Falls back to the URI
/// authority for requests in absolute form (and HTTP/2, where the authority
/// replaces `Host`).
///
/// # Errors
///
/// Returns [`AppError::Validation`] if neither source yields a host, or the
/// header is not valid UTF-8.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt:8080".parse().unwrap());
///
/// let host = request_host(&headers, &"/shorten".parse().unwrap()).unwrap();
/// assert_eq!(host, "sho.rt:8080");
/// ```
pub fn request_host(headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    if let Some(value) = headers.get(header::HOST) {
        let host = value
            .to_str()
            .map_err(|_| AppError::bad_request("Invalid Host header"))?;
        if !host.is_empty() {
            return Ok(host.to_string());
        }
    }

    uri.authority()
        .map(|authority| authority.as_str().to_string())
        .ok_or_else(|| AppError::bad_request("Missing Host header"))
}

/// Returns `"https"` when the request reached us over TLS, `"http"` otherwise.
///
/// This server speaks plaintext, so TLS is only observable through an
/// `https` URI scheme or, when `trust_forwarded_proto` is set, a proxy's
/// `X-Forwarded-Proto` header.
pub fn request_scheme(headers: &HeaderMap, uri: &Uri, trust_forwarded_proto: bool) -> &'static str {
    if uri.scheme() == Some(&Scheme::HTTPS) {
        return "https";
    }

    if trust_forwarded_proto {
        let forwarded_https = headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));
        if forwarded_https {
            return "https";
        }
    }

    "http"
}
