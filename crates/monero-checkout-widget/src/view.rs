//! Observable widget state, rebuilt from each gateway snapshot.

use chrono::{DateTime, Utc};
use monero_checkout::{InvoiceHandle, InvoiceInfo, InvoiceStatus};
use serde::Serialize;

use crate::status::PaymentStatus;

/// Everything a renderer needs to draw the payment box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentView {
    pub status: PaymentStatus,
    /// Requested amount in XMR.
    pub amount: f64,
    pub description: Option<String>,
    pub invoice_id: Option<String>,
    /// Address the customer pays to.
    pub address: Option<String>,
    /// Raw status from the last snapshot, including values the widget does
    /// not recognize.
    pub gateway_status: Option<InvoiceStatus>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Seconds left when the last snapshot arrived, floored at zero.
    pub time_remaining_secs: u64,
    /// Human-readable message while `status` is `Error`.
    pub error: Option<String>,
}

impl PaymentView {
    pub fn new(amount: f64, description: Option<String>) -> Self {
        Self {
            status: PaymentStatus::Initializing,
            amount,
            description,
            invoice_id: None,
            address: None,
            gateway_status: None,
            expires_at: None,
            time_remaining_secs: 0,
            error: None,
        }
    }

    /// Back to `Creating` with the previous invoice forgotten.
    pub(crate) fn begin_creating(&mut self) {
        self.status = PaymentStatus::Creating;
        self.invoice_id = None;
        self.address = None;
        self.gateway_status = None;
        self.expires_at = None;
        self.time_remaining_secs = 0;
        self.error = None;
    }

    pub(crate) fn apply_invoice(&mut self, handle: &InvoiceHandle) {
        self.status = PaymentStatus::Pending;
        self.invoice_id = Some(handle.id.clone());
        self.address = Some(handle.address.clone());
    }

    pub(crate) fn apply_snapshot(&mut self, info: &InvoiceInfo, now: DateTime<Utc>) {
        self.status = PaymentStatus::from_invoice(&info.status);
        self.gateway_status = Some(info.status.clone());
        self.address = Some(info.address.clone());
        if let Some(expiry) = info.expires_at() {
            self.expires_at = Some(expiry);
            self.time_remaining_secs = info.seconds_remaining(now).unwrap_or(0);
        }
    }

    pub(crate) fn apply_error(&mut self, message: String) {
        self.status = PaymentStatus::Error;
        self.error = Some(message);
    }

    /// Remaining time as of the last snapshot, as `MM:SS`.
    pub fn countdown(&self) -> String {
        format_countdown(self.time_remaining_secs)
    }

    /// Remaining time recomputed against `now`, for renderers that tick
    /// faster than the poll interval.
    pub fn countdown_at(&self, now: DateTime<Utc>) -> String {
        let secs = self
            .expires_at
            .map(|expiry| (expiry - now).num_seconds().max(0) as u64)
            .unwrap_or(0);
        format_countdown(secs)
    }

    /// Show the "payment will be detected automatically" hint.
    pub fn awaiting_payment(&self) -> bool {
        matches!(
            self.status,
            PaymentStatus::Pending | PaymentStatus::Confirming
        )
    }
}

/// `MM:SS`, with minutes allowed to exceed 59. Zero renders as `00:00`.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
