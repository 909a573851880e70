//! Reverse proxy for `/api/*`.
//!
//! Requests keep their method, path, query, body and `Host` header; only the
//! URI's scheme and authority are rewritten to the upstream. Hop-by-hop
//! headers are dropped in both directions and the client address is
//! appended to `X-Forwarded-For`.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode, Uri,
        header::{CONNECTION, CONTENT_TYPE},
        uri::PathAndQuery,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Hop-by-hop headers (RFC 9110 section 7.6.1) that never cross the proxy.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forwards requests to a single upstream over HTTP/1.1.
#[derive(Clone)]
pub struct ApiProxy {
    upstream: SocketAddr,
    client: Client<HttpConnector, Body>,
}

impl std::fmt::Debug for ApiProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiProxy")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}

impl ApiProxy {
    pub fn new(upstream: SocketAddr) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { upstream, client }
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    /// Where `uri` goes on the upstream.
    pub fn upstream_uri(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme("http")
            .authority(self.upstream.to_string())
            .path_and_query(path_and_query)
            .build()
    }

    /// Forward one request and relay the upstream's response.
    ///
    /// An unreachable upstream answers `502 Bad Gateway`.
    pub async fn forward(&self, mut req: Request) -> Response {
        let client_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let uri = match self.upstream_uri(req.uri()) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(uri = %req.uri(), error = %e, "cannot build upstream uri");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        *req.uri_mut() = uri;

        strip_hop_by_hop(req.headers_mut());
        if let Some(ip) = client_addr {
            append_forwarded_for(req.headers_mut(), ip);
        }

        let method = req.method().clone();
        let target = req.uri().clone();
        tracing::debug!(%method, %target, "proxying request");

        match self.client.request(req).await {
            Ok(response) => {
                let mut response = response.map(Body::new);
                strip_hop_by_hop(response.headers_mut());
                response
            }
            Err(e) => {
                tracing::error!(%method, %target, error = %e, "upstream request failed");
                bad_gateway(&format!("upstream {} unavailable", self.upstream))
            }
        }
    }
}

/// Axum handler for the proxied routes.
pub async fn proxy_handler(State(proxy): State<ApiProxy>, req: Request) -> Response {
    proxy.forward(req).await
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers listed in `Connection` are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, ip: std::net::IpAddr) {
    let value = match headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
    {
        Some(prior) if !prior.trim().is_empty() => format!("{prior}, {ip}"),
        _ => ip.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

fn bad_gateway(message: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.to_string(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_uri_keeps_path_and_query() {
        let proxy = ApiProxy::new("127.0.0.1:8080".parse().unwrap());
        let uri: Uri = "/api/users/7?expand=true".parse().unwrap();
        assert_eq!(
            proxy.upstream_uri(&uri).unwrap().to_string(),
            "http://127.0.0.1:8080/api/users/7?expand=true"
        );
    }

    #[test]
    fn test_upstream_uri_ipv6() {
        let proxy = ApiProxy::new("[::]:8080".parse().unwrap());
        let uri: Uri = "/api/".parse().unwrap();
        assert_eq!(
            proxy.upstream_uri(&uri).unwrap().to_string(),
            "http://[::]:8080/api/"
        );
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive, x-private"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-private", HeaderValue::from_static("1"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("accept"));
    }

    #[test]
    fn test_append_forwarded_for() {
        let mut headers = HeaderMap::new();
        append_forwarded_for(&mut headers, "10.0.0.1".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1");

        append_forwarded_for(&mut headers, "::1".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1, ::1");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let proxy = ApiProxy::new(addr);
        let req = axum::http::Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = proxy.forward(req).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
