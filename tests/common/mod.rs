//! Shared mock query gateway for integration tests.

use std::sync::Arc;
use std::thread;

use tiny_http::{Header, Response, Server};

/// Spawn a mock gateway on an ephemeral port. The handler receives
/// (method, url-with-query) and returns (status, JSON body). The server
/// thread runs until the process exits, which is fine for tests.
pub fn spawn_gateway<F>(handler: F) -> String
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("failed to bind mock gateway");
    let port = server.server_addr().to_ip().expect("tcp listener").port();
    let server = Arc::new(server);

    let handler = Arc::new(handler);
    thread::spawn(move || {
        // One thread per request so overlapping client calls are answered
        // concurrently, the way the real gateway behaves.
        for request in server.incoming_requests() {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                let method = request.method().as_str().to_string();
                let url = request.url().to_string();
                let (status, body) = handler(&method, &url);
                let header = Header::from_bytes("Content-Type", "application/json").unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            });
        }
    });

    format!("http://127.0.0.1:{}", port)
}

/// Gateway settings pointing at a mock server with short timeouts.
pub fn test_settings(base_url: &str) -> bugdeck::config::GatewaySettings {
    bugdeck::config::GatewaySettings {
        base_url: base_url.to_string(),
        connect_timeout_secs: 2,
        read_timeout_secs: 5,
    }
}

/// Minimal record JSON for a given ticket/source, with enough fields to be
/// useful in filter assertions.
pub fn record_json(
    ticket: &str,
    source: &str,
    priority: &str,
    state_field: &str,
    state: &str,
) -> serde_json::Value {
    let mut value = serde_json::json!({
        "PK": ticket,
        "SK": format!("{}#{}", source, ticket),
        "sourceSystem": source,
        "priority": priority,
        "subject": format!("Issue {}", ticket),
        "createdAt": "2025-06-01T08:00:00Z",
        "updatedAt": "2025-06-02T08:00:00Z"
    });
    // "state" for Slack/Shortcut records, "status" for Zendesk ones.
    value[state_field] = serde_json::Value::String(state.to_string());
    value
}
