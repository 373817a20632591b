//! The widget task: create an invoice, follow it, report to the observer.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use monero_checkout::{
    CheckoutError, GatewayTransport, InvoiceRequest, MoneroGateway, DEFAULT_POLL_INTERVAL,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::observer::PaymentObserver;
use crate::view::PaymentView;

/// What the widget asks the gateway for.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Amount in XMR.
    pub amount: f64,
    pub description: Option<String>,
    pub refund_address: Option<String>,
    /// Delay between status checks (default: 10 s).
    pub check_interval: Duration,
}

impl WidgetConfig {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            description: None,
            refund_address: None,
            check_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_refund_address(mut self, refund_address: impl Into<String>) -> Self {
        self.refund_address = Some(refund_address.into());
        self
    }

    pub fn with_check_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    fn invoice_request(&self) -> InvoiceRequest {
        InvoiceRequest {
            amount: self.amount,
            description: self.description.clone(),
            refund_address: self.refund_address.clone(),
        }
    }
}

/// How one create-and-follow attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Paid,
    Expired,
    Failed,
}

pub struct PaymentWidget;

impl PaymentWidget {
    /// Start the widget on the current tokio runtime.
    ///
    /// The returned handle owns the task: dropping it (or calling
    /// [`WidgetHandle::unmount`]) stops all polling.
    pub fn mount<T>(
        client: Arc<MoneroGateway<T>>,
        config: WidgetConfig,
        observer: Arc<dyn PaymentObserver>,
    ) -> WidgetHandle
    where
        T: GatewayTransport + 'static,
    {
        let view = PaymentView::new(config.amount, config.description.clone());
        let (view_tx, view_rx) = watch::channel(view);
        let (retry_tx, retry_rx) = mpsc::channel(1);

        let task = tokio::spawn(run(client, config, observer, view_tx, retry_rx));

        WidgetHandle {
            view_rx,
            retry_tx,
            task,
        }
    }
}

/// Handle to a mounted widget.
#[derive(Debug)]
pub struct WidgetHandle {
    view_rx: watch::Receiver<PaymentView>,
    retry_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl WidgetHandle {
    /// Current state.
    pub fn view(&self) -> PaymentView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PaymentView> {
        self.view_rx.clone()
    }

    /// Ask for a fresh invoice. Only acted on once the current attempt has
    /// failed or expired. Returns `false` if the widget is no longer running.
    pub fn retry(&self) -> bool {
        match self.retry_tx.try_send(()) {
            Ok(()) => true,
            // one retry already queued
            Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling and tear the widget down.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T: GatewayTransport>(
    client: Arc<MoneroGateway<T>>,
    config: WidgetConfig,
    observer: Arc<dyn PaymentObserver>,
    view_tx: watch::Sender<PaymentView>,
    mut retry_rx: mpsc::Receiver<()>,
) {
    tracing::info!(
        amount = config.amount,
        interval = ?config.check_interval,
        "payment widget mounted"
    );

    loop {
        match attempt(&client, &config, observer.as_ref(), &view_tx).await {
            Outcome::Paid => {
                tracing::debug!("payment widget finished");
                return;
            }
            Outcome::Expired | Outcome::Failed => {}
        }

        // clicks made while the attempt was still running are stale
        while retry_rx.try_recv().is_ok() {}

        if retry_rx.recv().await.is_none() {
            return;
        }
        tracing::info!("payment retry requested");
    }
}

/// Create one invoice and follow it until it settles, expires, or fails.
async fn attempt<T: GatewayTransport>(
    client: &MoneroGateway<T>,
    config: &WidgetConfig,
    observer: &dyn PaymentObserver,
    view_tx: &watch::Sender<PaymentView>,
) -> Outcome {
    publish(view_tx, observer, |view| view.begin_creating());

    let handle = match client.create_invoice(&config.invoice_request()).await {
        Ok(handle) => handle,
        Err(e) => return fail(view_tx, observer, e),
    };

    publish(view_tx, observer, |view| view.apply_invoice(&handle));
    observer.on_payment_started(&handle.id, &handle.address);

    let mut paid = false;
    let mut snapshots = client.watch_invoice(&handle.id, config.check_interval);
    while let Some(item) = snapshots.next().await {
        let info = match item {
            Ok(info) => info,
            Err(e) => return fail(view_tx, observer, e),
        };

        let now = chrono::Utc::now();
        publish(view_tx, observer, |view| view.apply_snapshot(&info, now));

        if info.is_paid() && !paid {
            paid = true;
            tracing::info!(invoice_id = %handle.id, "payment complete");
            observer.on_payment_complete(&handle.id);
        }
    }

    if paid {
        Outcome::Paid
    } else {
        tracing::info!(invoice_id = %handle.id, "invoice expired");
        Outcome::Expired
    }
}

fn fail(
    view_tx: &watch::Sender<PaymentView>,
    observer: &dyn PaymentObserver,
    error: CheckoutError,
) -> Outcome {
    tracing::warn!(error = %error, "payment widget error");
    publish(view_tx, observer, |view| view.apply_error(error.to_string()));
    observer.on_payment_error(&error);
    Outcome::Failed
}

fn publish(
    view_tx: &watch::Sender<PaymentView>,
    observer: &dyn PaymentObserver,
    update: impl FnOnce(&mut PaymentView),
) {
    view_tx.send_modify(update);
    let snapshot = view_tx.borrow().clone();
    observer.on_state_change(&snapshot);
}
