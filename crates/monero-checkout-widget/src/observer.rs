//! Lifecycle callbacks fired by the widget.

use monero_checkout::CheckoutError;

use crate::view::PaymentView;

/// Receives widget events. Every method defaults to a no-op.
///
/// Callbacks run on the widget's task; keep them short.
pub trait PaymentObserver: Send + Sync + 'static {
    /// The view changed.
    fn on_state_change(&self, _view: &PaymentView) {}

    /// An invoice was created and is ready to be paid.
    fn on_payment_started(&self, _invoice_id: &str, _address: &str) {}

    /// The gateway reported `Received`. Fired once per invoice.
    fn on_payment_complete(&self, _invoice_id: &str) {}

    /// Creating or polling the invoice failed.
    fn on_payment_error(&self, _error: &CheckoutError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PaymentObserver for NoopObserver {}

type StartedFn = Box<dyn Fn(&str, &str) + Send + Sync>;
type CompleteFn = Box<dyn Fn(&str) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&CheckoutError) + Send + Sync>;

/// Closure-based observer for callers that only care about a few events.
#[derive(Default)]
pub struct Callbacks {
    started: Option<StartedFn>,
    complete: Option<CompleteFn>,
    error: Option<ErrorFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_started(mut self, f: impl Fn(&str, &str) + Send + Sync + 'static) -> Self {
        self.started = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&CheckoutError) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("started", &self.started.is_some())
            .field("complete", &self.complete.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

impl PaymentObserver for Callbacks {
    fn on_payment_started(&self, invoice_id: &str, address: &str) {
        if let Some(f) = &self.started {
            f(invoice_id, address);
        }
    }

    fn on_payment_complete(&self, invoice_id: &str) {
        if let Some(f) = &self.complete {
            f(invoice_id);
        }
    }

    fn on_payment_error(&self, error: &CheckoutError) {
        if let Some(f) = &self.error {
            f(error);
        }
    }
}
