use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::config::GatewayConfig;
use crate::constants::{
    DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, INVOICE_ID_LEN, INVOICE_INFO_PATH,
    NEW_INVOICE_PATH,
};
use crate::error::{CheckoutError, Result};
use crate::invoice::{InvoiceHandle, InvoiceInfo, InvoiceRequest, InvoiceStatus};
use crate::transport::{GatewayRequest, GatewayTransport, HttpTransport};

/// Bounds for [`MoneroGateway::wait_for_payment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up once this much time has passed since the first check.
    pub timeout: Duration,
    /// Delay between the end of one check and the start of the next.
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// Stream of status snapshots for one invoice. See [`MoneroGateway::watch_invoice`].
pub type InvoiceWatch<'a> = BoxStream<'a, Result<InvoiceInfo>>;

/// Client for a Monero invoice gateway.
///
/// Holds no per-invoice state: every call is keyed by the invoice id and every
/// status is fetched fresh from the gateway.
#[derive(Debug, Clone)]
pub struct MoneroGateway<T: GatewayTransport = HttpTransport> {
    config: GatewayConfig,
    transport: T,
}

impl MoneroGateway<HttpTransport> {
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: GatewayTransport> MoneroGateway<T> {
    pub fn with_transport(config: GatewayConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Create a new invoice. One request, no retry.
    pub async fn create_invoice(&self, request: &InvoiceRequest) -> Result<InvoiceHandle> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(CheckoutError::InvalidArgument(
                "amount must be greater than 0".to_string(),
            ));
        }

        let handle: InvoiceHandle = self
            .get_json(NEW_INVOICE_PATH, request.query_pairs(), "create invoice")
            .await?;

        tracing::info!(
            invoice_id = %handle.id,
            amount = request.amount,
            "invoice created"
        );
        Ok(handle)
    }

    /// Fetch the current state of an invoice.
    pub async fn check_invoice(&self, id: &str) -> Result<InvoiceInfo> {
        validate_invoice_id(id)?;

        let info: InvoiceInfo = self
            .get_json(
                INVOICE_INFO_PATH,
                vec![("id", id.to_string())],
                "check invoice",
            )
            .await?;

        tracing::debug!(invoice_id = %id, status = %info.status, "invoice status");
        Ok(info)
    }

    /// `true` iff the gateway reports the invoice as `Received`.
    pub async fn is_payment_complete(&self, id: &str) -> Result<bool> {
        let info = self.check_invoice(id).await?;
        Ok(info.status == InvoiceStatus::Received)
    }

    /// Poll until the invoice is paid or `options.timeout` elapses.
    ///
    /// Checks run back to back with `options.poll_interval` between them, so
    /// there is never more than one request in flight. The deadline is fixed
    /// at entry, so slow responses eat into the budget instead of extending
    /// it. Any error from a check ends the wait immediately.
    pub async fn wait_for_payment(&self, id: &str, options: WaitOptions) -> Result<()> {
        require_positive(options.timeout, "timeout")?;
        require_positive(options.poll_interval, "poll interval")?;

        // None: the timeout is too large to represent, so there is no deadline
        let deadline = Instant::now().checked_add(options.timeout);
        let mut checks: u32 = 0;

        loop {
            checks += 1;
            if self.is_payment_complete(id).await? {
                tracing::info!(invoice_id = %id, checks, "payment received");
                return Ok(());
            }

            if deadline.is_some_and(|deadline| Instant::now() > deadline) {
                tracing::warn!(
                    invoice_id = %id,
                    checks,
                    timeout = ?options.timeout,
                    "gave up waiting for payment"
                );
                return Err(CheckoutError::Timeout(options.timeout));
            }

            tokio::time::sleep(options.poll_interval).await;
        }
    }

    /// [`wait_for_payment`](Self::wait_for_payment) with a 30 minute timeout
    /// and a 10 second interval.
    pub async fn wait_for_payment_default(&self, id: &str) -> Result<()> {
        self.wait_for_payment(id, WaitOptions::default()).await
    }

    /// Stream status snapshots for an invoice.
    ///
    /// The first check happens on the first poll of the stream, then one per
    /// `interval`. The stream ends after yielding a terminal status
    /// (`Received` or `Expired`) or an error. Nothing runs in the background:
    /// dropping the stream stops the polling.
    pub fn watch_invoice<'a>(&'a self, id: &str, interval: Duration) -> InvoiceWatch<'a> {
        let rejected = validate_invoice_id(id)
            .and_then(|_| require_positive(interval, "poll interval"))
            .err();

        let state = WatchState {
            id: id.to_string(),
            interval,
            checks: 0,
            finished: false,
            rejected,
        };

        stream::unfold(state, move |mut state| async move {
            if state.finished {
                return None;
            }
            if let Some(err) = state.rejected.take() {
                state.finished = true;
                return Some((Err(err), state));
            }
            if state.checks > 0 {
                tokio::time::sleep(state.interval).await;
            }
            state.checks += 1;

            let item = self.check_invoice(&state.id).await;
            state.finished = match &item {
                Ok(info) => info.status.is_terminal(),
                Err(_) => true,
            };
            Some((item, state))
        })
        .boxed()
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&'static str, String)>,
        operation: &str,
    ) -> Result<R> {
        let mut url = self.config.gateway_url.join(path).map_err(|e| {
            CheckoutError::Gateway(format!("failed to {operation}: invalid gateway URL: {e}"))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        let request = GatewayRequest {
            url,
            auth_token: self.config.credential.clone(),
        };
        tracing::debug!(url = %request.url, "gateway request");

        let resp = self.transport.get(request).await.map_err(|e| {
            tracing::warn!(error = %e, operation, "gateway unreachable");
            CheckoutError::Gateway(format!("failed to {operation}: {e}"))
        })?;

        if !resp.is_success() {
            let detail = resp.body.trim();
            let detail = if detail.is_empty() {
                format!("HTTP {}", resp.status)
            } else {
                detail.to_string()
            };
            tracing::warn!(status = resp.status, operation, "gateway rejected request");
            return Err(CheckoutError::Gateway(format!(
                "failed to {operation}: {detail}"
            )));
        }

        serde_json::from_str(&resp.body).map_err(|e| {
            CheckoutError::Gateway(format!("failed to {operation}: invalid response body: {e}"))
        })
    }
}

struct WatchState {
    id: String,
    interval: Duration,
    checks: u32,
    finished: bool,
    rejected: Option<CheckoutError>,
}

fn validate_invoice_id(id: &str) -> Result<()> {
    if id.chars().count() != INVOICE_ID_LEN {
        return Err(CheckoutError::InvalidArgument(format!(
            "invalid invoice ID: expected {INVOICE_ID_LEN} characters"
        )));
    }
    Ok(())
}

fn require_positive(value: Duration, name: &str) -> Result<()> {
    if value.is_zero() {
        return Err(CheckoutError::InvalidArgument(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}
