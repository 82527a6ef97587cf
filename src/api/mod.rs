//! Query gateway access: HTTP client, wire types, and the error taxonomy.

mod client;
mod types;

pub use client::GatewayClient;
pub use types::{SummaryCounts, TimeSeriesPoint};

use thiserror::Error;

/// Errors from the query gateway, split the way callers react to them:
/// transport problems are retryable, rejections carry a message to show
/// verbatim, and invalid input never reaches the network.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network, timeout, or non-2xx status.
    #[error("gateway request failed: {0}")]
    Http(String),

    /// The gateway answered, but not in a shape we can read.
    #[error("unexpected gateway response: {0}")]
    BadResponse(String),

    /// Envelope with `success: false`; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Rejected client-side before any network call.
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<ureq::Error> for GatewayError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                let body = body.trim();
                if body.is_empty() {
                    GatewayError::Http(format!("HTTP {}", code))
                } else {
                    GatewayError::Http(format!("HTTP {}: {}", code, body))
                }
            }
            ureq::Error::Transport(t) => GatewayError::Http(t.to_string()),
        }
    }
}
