//! Request/response seam between the client and the network.
//!
//! The client only ever issues `GET` requests with query parameters and an
//! optional auth header, so the transport surface is exactly that.

use url::Url;

use crate::constants::{AUTH_HEADER, REQUEST_TIMEOUT};

/// A single outbound gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    /// Full URL, query string included.
    pub url: Url,
    /// Sent as `X-Auth-Token` when present.
    pub auth_token: Option<String>,
}

/// Raw gateway reply. Interpreting the status is the client's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes gateway requests. `Err` carries the transport's diagnostic message.
pub trait GatewayTransport: Send + Sync {
    fn get(
        &self,
        request: GatewayRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse, String>> + Send;
}

/// [`GatewayTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build tuned HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self { http }
    }

    /// Use a caller-configured `reqwest::Client` (proxies, TLS roots, ...).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayTransport for HttpTransport {
    async fn get(&self, request: GatewayRequest) -> Result<TransportResponse, String> {
        let mut req = self.http.get(request.url);
        if let Some(token) = request.auth_token {
            req = req.header(AUTH_HEADER, token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;

        Ok(TransportResponse { status, body })
    }
}
