use monero_checkout::InvoiceStatus;
use serde::{Deserialize, Serialize};

/// What the widget is showing. Covers the local phases (`Initializing`,
/// `Creating`, `Error`) as well as the gateway-reported ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Initializing,
    Creating,
    Pending,
    Confirming,
    Received,
    Expired,
    Error,
}

impl PaymentStatus {
    /// Map a gateway status. Unknown gateway values keep the widget in
    /// `Pending` so polling continues.
    pub fn from_invoice(status: &InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Pending => PaymentStatus::Pending,
            InvoiceStatus::Confirming => PaymentStatus::Confirming,
            InvoiceStatus::Received => PaymentStatus::Received,
            InvoiceStatus::Expired => PaymentStatus::Expired,
            InvoiceStatus::Other(raw) => {
                tracing::debug!(status = %raw, "unrecognized gateway status, showing as pending");
                PaymentStatus::Pending
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initializing => "initializing",
            PaymentStatus::Creating => "creating",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirming => "confirming",
            PaymentStatus::Received => "received",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Error => "error",
        }
    }

    /// Capitalized name for display.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Initializing => "Initializing",
            PaymentStatus::Creating => "Creating",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Confirming => "Confirming",
            PaymentStatus::Received => "Received",
            PaymentStatus::Expired => "Expired",
            PaymentStatus::Error => "Error",
        }
    }

    /// No invoice to show yet.
    pub fn is_loading(&self) -> bool {
        matches!(self, PaymentStatus::Initializing | PaymentStatus::Creating)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
