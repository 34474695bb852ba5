/*
[INPUT]:  Test scenarios needing a controllable message channel
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for oracle-dash-client tests

use std::sync::{Arc, Mutex};

use oracle_dash_client::{OracleError, Result, Transport};
use serde_json::Value;

/// Transport that records every transmitted frame for inspection and can
/// be switched to fail fast, standing in for a closed socket.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportState>>,
}

#[derive(Default)]
struct MockTransportState {
    frames: Vec<Value>,
    closed: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames transmitted so far, parsed back into JSON values.
    pub fn sent(&self) -> Vec<Value> {
        self.inner.lock().unwrap().frames.clone()
    }

    /// The correlation id stamped on the most recent frame.
    pub fn last_id(&self) -> u64 {
        self.sent()
            .last()
            .and_then(|frame| frame["id"].as_u64())
            .expect("no frame with an id transmitted")
    }

    /// Make subsequent transmits fail with `NotConnected`.
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
    }
}

impl Transport for MockTransport {
    fn transmit(&mut self, frame: &str) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.closed {
            return Err(OracleError::NotConnected);
        }
        state.frames.push(serde_json::from_str(frame).expect("outbound frame is JSON"));
        Ok(())
    }
}

/// Two-product fixture in the service's `get_product_list` shape.
pub fn product_list_json() -> Value {
    serde_json::json!([
        {
            "account": "5uKdRzB3FzdmwyCHrqSGq4u2URja617jqtKkM71BVrkw",
            "attr_dict": {
                "symbol": "ETH/USD",
                "asset_type": "Crypto",
                "quote_currency": "USD",
                "description": "ETH/USD crypto pair"
            },
            "price": [
                {
                    "account": "JBu1AL4obBcCMqKBBxhpWCNUt136ijcuMZLFvTP7iWdB",
                    "price_exponent": -8,
                    "price_type": "price"
                }
            ]
        },
        {
            "account": "3m1y5h2uv7EQL3KaJZehvAJa4yDNvgc5yAdL9KPMKwvk",
            "attr_dict": {
                "symbol": "BTC/USD",
                "asset_type": "Crypto",
                "quote_currency": "USD",
                "description": "BTC/USD crypto pair"
            },
            "price": [
                {
                    "account": "GVXRSBjFk6e6J3NbVPXohDJetcTjaeeuykUpbQF8UoMU",
                    "price_exponent": -5,
                    "price_type": "price"
                }
            ]
        }
    ])
}
