use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for a new invoice. Built per call and not retained by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRequest {
    /// Amount in XMR. Must be finite and strictly positive.
    pub amount: f64,
    pub description: Option<String>,
    /// Address the gateway refunds to if the invoice is overpaid or cancelled.
    pub refund_address: Option<String>,
}

impl InvoiceRequest {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            description: None,
            refund_address: None,
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

    /// Query parameters for the create call. Empty optionals are omitted.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("amount", self.amount.to_string())];
        if let Some(description) = self.description.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("description", description.to_string()));
        }
        if let Some(refund) = self.refund_address.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("refund", refund.to_string()));
        }
        pairs
    }
}

/// Returned once by invoice creation. The id is the only key for later lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHandle {
    pub id: String,
    /// Destination the customer pays to.
    pub address: String,
}

/// Gateway-reported invoice state.
///
/// The gateway sends free-form strings. Anything outside the known set is kept
/// as [`InvoiceStatus::Other`] rather than rejected. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Pending,
    Confirming,
    Received,
    Expired,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Confirming => "Confirming",
            InvoiceStatus::Received => "Received",
            InvoiceStatus::Expired => "Expired",
            InvoiceStatus::Other(s) => s,
        }
    }

    /// The gateway never moves an invoice out of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Received | InvoiceStatus::Expired)
    }
}

impl From<String> for InvoiceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => InvoiceStatus::Pending,
            "Confirming" => InvoiceStatus::Confirming,
            "Received" => InvoiceStatus::Received,
            "Expired" => InvoiceStatus::Expired,
            _ => InvoiceStatus::Other(s),
        }
    }
}

impl From<&str> for InvoiceStatus {
    fn from(s: &str) -> Self {
        InvoiceStatus::from(s.to_string())
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status snapshot, always fetched fresh from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    pub status: InvoiceStatus,
    /// Amount as formatted by the gateway.
    pub amount: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund: Option<String>,
    /// Expiry timestamp as sent by the gateway.
    pub expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InvoiceInfo {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Received
    }

    /// Parsed expiry. Accepts RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` (UTC),
    /// or unix seconds. Returns `None` for anything else.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_expiry(&self.expiry)
    }

    /// Whole seconds until expiry, floored at zero.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at()
            .map(|expiry| (expiry - now).num_seconds().max(0) as u64)
    }
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
