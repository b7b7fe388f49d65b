use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::CarrierConfig;
use crate::domain::errors::ShipmentError;
use crate::domain::ports::ShipmentCarrier;
use crate::domain::shipment::{error_message, interpret_reply, CarrierOrder, ShipmentRequest};

const TOKEN_HEADER: &str = "Token";

/// Blocking client for the GHTK order-creation endpoint.
///
/// Every call is a single POST bounded by the configured timeout; nothing is
/// retried.
pub struct GhtkClient {
    http: Client,
    endpoint: String,
}

impl GhtkClient {
    pub fn new(config: &CarrierConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ShipmentCarrier for GhtkClient {
    fn create_order(
        &self,
        token: &str,
        request: &ShipmentRequest,
    ) -> Result<CarrierOrder, ShipmentError> {
        let body = serde_json::to_vec(request)
            .map_err(|e| ShipmentError::Unexpected(format!("cannot encode request: {e}")))?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(TOKEN_HEADER, token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().map_err(transport_error)?;

        if !status.is_success() {
            log::debug!("GHTK answered {}: {}", status, text);
            return Err(match error_message(&text) {
                Some(message) => ShipmentError::CarrierInvalidData(message),
                None => ShipmentError::CarrierHttp {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        interpret_reply(&text)
    }
}

fn transport_error(e: reqwest::Error) -> ShipmentError {
    if e.is_timeout() {
        ShipmentError::Timeout
    } else {
        ShipmentError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use serde_json::Value;

    use super::GhtkClient;
    use crate::config::CarrierConfig;
    use crate::domain::errors::ShipmentError;
    use crate::domain::ports::ShipmentCarrier;
    use crate::domain::shipment::{fixtures, validate_and_build, CarrierOrder};

    #[derive(Clone, Default)]
    struct Captured {
        token: Arc<Mutex<Option<String>>>,
        content_type: Arc<Mutex<Option<String>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    /// What the fake carrier answers to every request.
    #[derive(Clone)]
    enum Reply {
        Json(u16, Value),
        Text(u16, &'static str),
        Stall(Duration),
    }

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .expect("bind failed")
            .local_addr()
            .expect("addr failed")
            .port()
    }

    /// Start a fake carrier on an ephemeral port and return its endpoint URL.
    fn start_fake_carrier(reply: Reply, captured: Captured) -> String {
        let server = HttpServer::new(move || {
            let reply = reply.clone();
            let captured = captured.clone();
            App::new().route(
                "/services/shipment/order",
                web::post().to(move |req: HttpRequest, body: web::Bytes| {
                    let reply = reply.clone();
                    let captured = captured.clone();
                    async move {
                        let header = |name: &str| {
                            req.headers()
                                .get(name)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string)
                        };
                        *captured.token.lock().unwrap() = header("Token");
                        *captured.content_type.lock().unwrap() = header("Content-Type");
                        *captured.body.lock().unwrap() = serde_json::from_slice(&body).ok();

                        match reply {
                            Reply::Json(status, value) => {
                                HttpResponse::build(status_code(status)).json(value)
                            }
                            Reply::Text(status, text) => {
                                HttpResponse::build(status_code(status)).body(text)
                            }
                            Reply::Stall(delay) => {
                                actix_web::rt::time::sleep(delay).await;
                                HttpResponse::Ok().finish()
                            }
                        }
                    }
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake carrier");
        let port = server.addrs()[0].port();
        tokio::spawn(server.run());
        format!("http://127.0.0.1:{}/services/shipment/order", port)
    }

    fn status_code(code: u16) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(code).expect("valid status")
    }

    /// The blocking client must be built, used and dropped off the async
    /// runtime.
    async fn submit(endpoint: String, timeout_secs: u64) -> Result<CarrierOrder, ShipmentError> {
        tokio::task::spawn_blocking(move || {
            let client = GhtkClient::new(&CarrierConfig {
                endpoint,
                timeout_secs,
            })
            .expect("client builds");
            let request = validate_and_build(&fixtures::order("S00042")).expect("valid order");
            client.create_order("test-token", &request)
        })
        .await
        .expect("blocking task panicked")
    }

    #[tokio::test]
    async fn success_reply_is_parsed_and_headers_are_sent() {
        let captured = Captured::default();
        let endpoint = start_fake_carrier(
            Reply::Json(
                200,
                serde_json::json!({
                    "success": true,
                    "order": {"label": "LP123", "status_id": 5}
                }),
            ),
            captured.clone(),
        );

        let carrier = submit(endpoint, 10).await.expect("should succeed");

        assert_eq!(carrier.label.as_deref(), Some("LP123"));
        assert_eq!(carrier.status_id.as_deref(), Some("5"));
        assert_eq!(captured.token.lock().unwrap().as_deref(), Some("test-token"));
        assert_eq!(
            captured.content_type.lock().unwrap().as_deref(),
            Some("application/json")
        );
        let body = captured.body.lock().unwrap().clone().expect("json body");
        assert_eq!(body["order"]["id"], "S00042");
        assert_eq!(body["products"][0]["name"], "Coffee beans");
    }

    #[tokio::test]
    async fn business_failure_surfaces_message() {
        let endpoint = start_fake_carrier(
            Reply::Json(
                200,
                serde_json::json!({"success": false, "message": "Invalid phone"}),
            ),
            Captured::default(),
        );

        match submit(endpoint, 10).await {
            Err(ShipmentError::CarrierRejected(msg)) => assert_eq!(msg, "Invalid phone"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_with_json_body_surfaces_message() {
        let endpoint = start_fake_carrier(
            Reply::Json(400, serde_json::json!({"message": "Province not supported"})),
            Captured::default(),
        );

        match submit(endpoint, 10).await {
            Err(ShipmentError::CarrierInvalidData(msg)) => {
                assert_eq!(msg, "Province not supported")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_with_opaque_body_surfaces_status_and_text() {
        let endpoint = start_fake_carrier(
            Reply::Text(503, "Service Unavailable"),
            Captured::default(),
        );

        match submit(endpoint, 10).await {
            Err(ShipmentError::CarrierHttp { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_carrier_times_out() {
        let endpoint = start_fake_carrier(
            Reply::Stall(Duration::from_secs(3)),
            Captured::default(),
        );

        let err = submit(endpoint, 1).await.unwrap_err();
        assert!(matches!(err, ShipmentError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_carrier_is_a_transport_failure() {
        let endpoint = format!("http://127.0.0.1:{}/services/shipment/order", free_port());

        let err = submit(endpoint, 5).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
