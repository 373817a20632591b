//! Client SDK for accepting Monero payments through a remote invoice gateway.
//!
//! The gateway owns every invoice: it generates the payment address, watches
//! the chain, and reports status. This crate only asks it to create invoices
//! and reads their state back.
//!
//! # Quick example
//!
//! ```no_run
//! use monero_checkout::{GatewayConfig, InvoiceRequest, MoneroGateway, WaitOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new("https://pay.example.com")?.with_credential("api-key");
//! let gateway = MoneroGateway::new(config);
//!
//! let invoice = gateway
//!     .create_invoice(&InvoiceRequest::new(0.05).with_description("Coffee"))
//!     .await?;
//! println!("Send 0.05 XMR to {}", invoice.address);
//!
//! gateway
//!     .wait_for_payment(&invoice.id, WaitOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod invoice;
pub mod transport;

pub use client::{InvoiceWatch, MoneroGateway, WaitOptions};
pub use config::{ConfigError, GatewayConfig};
pub use constants::*;
pub use error::{CheckoutError, Result};
pub use invoice::{InvoiceHandle, InvoiceInfo, InvoiceRequest, InvoiceStatus};
pub use transport::{GatewayRequest, GatewayTransport, HttpTransport, TransportResponse};
