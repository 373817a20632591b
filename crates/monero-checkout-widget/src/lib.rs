//! Payment widget state for Monero checkout pages.
//!
//! A mounted widget creates one invoice, follows it through the gateway's
//! status stream, and publishes a [`PaymentView`] that any renderer (HTML
//! template, TUI, websocket push) can draw. Lifecycle events go to a
//! [`PaymentObserver`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use checkout_widget::{Callbacks, PaymentWidget, WidgetConfig};
//! use monero_checkout::{GatewayConfig, MoneroGateway};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Arc::new(MoneroGateway::new(GatewayConfig::new("https://pay.example.com")?));
//! let observer = Callbacks::new()
//!     .on_started(|id, address| println!("invoice {id}: pay to {address}"))
//!     .on_complete(|id| println!("invoice {id} paid"));
//!
//! let widget = PaymentWidget::mount(gateway, WidgetConfig::new(0.05), Arc::new(observer));
//! let mut updates = widget.subscribe();
//! while updates.changed().await.is_ok() {
//!     let view = updates.borrow().clone();
//!     println!("{} {}", view.status.label(), view.countdown());
//! }
//! # Ok(())
//! # }
//! ```

pub mod observer;
pub mod status;
pub mod view;
pub mod widget;

pub use observer::{Callbacks, NoopObserver, PaymentObserver};
pub use status::PaymentStatus;
pub use view::{format_countdown, PaymentView};
pub use widget::{PaymentWidget, WidgetConfig, WidgetHandle};
