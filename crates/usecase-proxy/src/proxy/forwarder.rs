use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header::HeaderName, HeaderValue, Response, StatusCode},
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::utils::error::ApiError;

/// Largest request body the proxy will buffer for relay.
const MAX_RELAY_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Transparent relay to the configured backend origin.
///
/// Forwards method, path, query, headers (minus `host`) and raw body
/// unmodified, and hands the backend's status, headers, and body back
/// byte-for-byte. Knows nothing about what the backend serves.
#[derive(Clone)]
pub struct Forwarder {
    client: Client,
    backend_url: String,
}

impl Forwarder {
    pub fn new(backend_url: String, timeout_seconds: u64) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Relay one request to the backend and return its response.
    pub async fn forward(&self, request: Request) -> Result<Response<Body>, ApiError> {
        let (parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target_url = format!("{}{}", self.backend_url, path_and_query);

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|e| ApiError::InternalError(format!("Invalid method: {}", e)))?;

        // Forward all client headers except host, which belongs to the backend.
        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in parts.headers.iter() {
            if name == axum::http::header::HOST {
                continue;
            }
            let name = reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes())
                .map_err(|e| ApiError::InternalError(format!("Invalid header name: {}", e)))?;
            let value = reqwest::header::HeaderValue::from_bytes(value.as_bytes())
                .map_err(|e| ApiError::InternalError(format!("Invalid header value: {}", e)))?;
            headers.append(name, value);
        }

        let body_bytes = to_bytes(body, MAX_RELAY_BODY_BYTES)
            .await
            .map_err(|e| ApiError::InternalError(format!("Failed to read request body: {}", e)))?;

        debug!(
            "Forwarding {} {} ({} body bytes)",
            method,
            target_url,
            body_bytes.len()
        );

        let backend_response = self
            .client
            .request(method, &target_url)
            .headers(headers)
            .body(body_bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ApiError::UpstreamUnavailable(e.to_string())
                } else {
                    ApiError::InternalError(e.to_string())
                }
            })?;

        let status = backend_response.status();
        let response_headers = backend_response.headers().clone();
        let response_body = backend_response
            .bytes()
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;

        info!("Proxied to: {} - Status: {}", target_url, status.as_u16());

        let mut builder = Response::builder().status(
            StatusCode::from_u16(status.as_u16())
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
        );

        for (name, value) in response_headers.iter() {
            // The relayed body is re-framed, so framing headers must not leak.
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            let name = HeaderName::from_bytes(name.as_str().as_bytes())
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
            let value = HeaderValue::from_bytes(value.as_bytes())
                .map_err(|e| ApiError::InternalError(e.to_string()))?;
            builder = builder.header(name, value);
        }

        builder
            .body(Body::from(response_body))
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    matches!(
        name,
        "connection" | "transfer-encoding" | "keep-alive" | "proxy-connection"
    )
}
