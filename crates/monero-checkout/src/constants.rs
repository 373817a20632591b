use std::time::Duration;

/// Gateway path that issues a new invoice.
pub const NEW_INVOICE_PATH: &str = "/api/monero/new";

/// Gateway path that reports an invoice's current state.
pub const INVOICE_INFO_PATH: &str = "/api/monero/info";

/// Header carrying the merchant's API key, when one is configured.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Invoice ids issued by the gateway are always this many characters.
pub const INVOICE_ID_LEN: usize = 16;

/// Default upper bound for [`wait_for_payment`](crate::MoneroGateway::wait_for_payment).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Per-request timeout applied by [`HttpTransport`](crate::HttpTransport).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the gateway base URL.
pub const ENV_GATEWAY_URL: &str = "MONERO_GATEWAY_URL";

/// Environment variable holding the optional API key.
pub const ENV_API_KEY: &str = "MONERO_GATEWAY_API_KEY";
