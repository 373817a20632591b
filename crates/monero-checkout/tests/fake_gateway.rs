//! Client tests against a local actix-web stand-in for the invoice gateway.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use futures::StreamExt;
use monero_checkout::{
    CheckoutError, GatewayConfig, InvoiceRequest, InvoiceStatus, MoneroGateway, WaitOptions,
};

const INVOICE_ID: &str = "abcd1234abcd1234";
const ADDRESS: &str = "4AdUndXHHZ6cfufTMvppY6JwXNouMBzSkbLYfpAV5Usx3skxNgYeYTRj5UzqtReoS44qo9mtmXCqY45DJ852K5Jv2684Rge";
const API_KEY: &str = "merchant-key";

/// Gateway state: expected API key, scripted statuses, and every query seen.
struct FakeGateway {
    api_key: Option<&'static str>,
    statuses: Mutex<VecDeque<&'static str>>,
    seen: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl FakeGateway {
    fn new(api_key: Option<&'static str>, statuses: &[&'static str]) -> web::Data<Self> {
        web::Data::new(Self {
            api_key,
            statuses: Mutex::new(statuses.iter().copied().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<(String, HashMap<String, String>)> {
        self.seen.lock().unwrap().clone()
    }

    fn authorized(&self, req: &HttpRequest) -> bool {
        match self.api_key {
            None => true,
            Some(key) => req
                .headers()
                .get("X-Auth-Token")
                .and_then(|v| v.to_str().ok())
                == Some(key),
        }
    }

    fn next_status(&self) -> &'static str {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or("Pending")
        } else {
            statuses.front().copied().unwrap_or("Pending")
        }
    }
}

async fn new_invoice(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    state: web::Data<FakeGateway>,
) -> HttpResponse {
    state
        .seen
        .lock()
        .unwrap()
        .push(("new".to_string(), query.0.clone()));

    if !state.authorized(&req) {
        return HttpResponse::Unauthorized().body("invalid api key");
    }

    HttpResponse::Ok().json(serde_json::json!({
        "id": INVOICE_ID,
        "address": ADDRESS,
    }))
}

async fn invoice_info(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    state: web::Data<FakeGateway>,
) -> HttpResponse {
    state
        .seen
        .lock()
        .unwrap()
        .push(("info".to_string(), query.0.clone()));

    if !state.authorized(&req) {
        return HttpResponse::Unauthorized().body("invalid api key");
    }
    if query.get("id").map(String::as_str) != Some(INVOICE_ID) {
        return HttpResponse::NotFound().body("invoice not found");
    }

    HttpResponse::Ok().json(serde_json::json!({
        "status": state.next_status(),
        "amount": "1.500000000000",
        "address": ADDRESS,
        "expiry": "2030-01-01T00:00:00Z",
        "description": "integration",
    }))
}

/// Start the fake gateway on an ephemeral port and return its base URL.
fn spawn_gateway(state: web::Data<FakeGateway>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/api/monero/new", web::get().to(new_invoice))
            .route("/api/monero/info", web::get().to(invoice_info))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake gateway");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{addr}")
}

fn client(base_url: &str, api_key: Option<&str>) -> MoneroGateway {
    let mut config = GatewayConfig::new(base_url).unwrap();
    if let Some(key) = api_key {
        config = config.with_credential(key);
    }
    MoneroGateway::new(config)
}

#[actix_rt::test]
async fn test_full_invoice_lifecycle_over_http() {
    let state = FakeGateway::new(Some(API_KEY), &["Pending", "Confirming", "Received"]);
    let base_url = spawn_gateway(state.clone());
    let gateway = client(&base_url, Some(API_KEY));

    let invoice = gateway
        .create_invoice(
            &InvoiceRequest::new(1.5)
                .with_description("integration")
                .with_refund_address("44refund"),
        )
        .await
        .unwrap();
    assert_eq!(invoice.id, INVOICE_ID);
    assert_eq!(invoice.address, ADDRESS);

    gateway
        .wait_for_payment(
            &invoice.id,
            WaitOptions::new(Duration::from_secs(5), Duration::from_millis(10)),
        )
        .await
        .unwrap();

    let seen = state.seen();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0].0, "new");
    assert_eq!(seen[0].1.get("amount").map(String::as_str), Some("1.5"));
    assert_eq!(
        seen[0].1.get("description").map(String::as_str),
        Some("integration")
    );
    assert_eq!(seen[0].1.get("refund").map(String::as_str), Some("44refund"));
    assert!(seen[1..].iter().all(|(path, _)| path == "info"));
}

#[actix_rt::test]
async fn test_missing_credential_surfaces_gateway_payload() {
    let state = FakeGateway::new(Some(API_KEY), &["Pending"]);
    let base_url = spawn_gateway(state);
    let gateway = client(&base_url, None);

    let err = gateway
        .create_invoice(&InvoiceRequest::new(1.0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "failed to create invoice: invalid api key");
}

#[actix_rt::test]
async fn test_unknown_invoice_is_gateway_error() {
    let state = FakeGateway::new(None, &["Pending"]);
    let base_url = spawn_gateway(state);
    let gateway = client(&base_url, None);

    let err = gateway.check_invoice("zzzz0000zzzz0000").await.unwrap_err();
    match err {
        CheckoutError::Gateway(msg) => assert!(msg.contains("invoice not found"), "{msg}"),
        other => panic!("expected gateway error, got {other:?}"),
    }
}

#[actix_rt::test]
async fn test_unrecognized_status_passes_through() {
    let state = FakeGateway::new(None, &["PartiallyPaid"]);
    let base_url = spawn_gateway(state);
    let gateway = client(&base_url, None);

    let info = gateway.check_invoice(INVOICE_ID).await.unwrap();
    assert_eq!(info.status, InvoiceStatus::Other("PartiallyPaid".to_string()));
    assert!(!gateway.is_payment_complete(INVOICE_ID).await.unwrap());
}

#[actix_rt::test]
async fn test_watch_streams_until_received() {
    let state = FakeGateway::new(None, &["Pending", "Pending", "Received"]);
    let base_url = spawn_gateway(state.clone());
    let gateway = client(&base_url, None);

    let statuses: Vec<InvoiceStatus> = gateway
        .watch_invoice(INVOICE_ID, Duration::from_millis(10))
        .map(|item| item.unwrap().status)
        .collect()
        .await;

    assert_eq!(statuses.last(), Some(&InvoiceStatus::Received));
    assert_eq!(statuses.len(), 3);
    assert_eq!(state.seen().len(), 3);
}

#[actix_rt::test]
async fn test_unreachable_gateway_is_gateway_error() {
    // Grab a free port, then close it so nothing is listening.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let gateway = client(&format!("http://127.0.0.1:{port}"), None);

    let err = gateway.check_invoice(INVOICE_ID).await.unwrap_err();
    match err {
        CheckoutError::Gateway(msg) => {
            assert!(msg.starts_with("failed to check invoice: request failed"), "{msg}")
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
}
