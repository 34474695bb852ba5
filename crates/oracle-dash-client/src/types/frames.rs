/*
[INPUT]:  Raw inbound JSON-RPC frames
[OUTPUT]: Typed response and notification frame structs
[POS]:    Data layer - protocol frame shapes
[UPDATE]: When the JSON-RPC framing changes
*/

use serde::Deserialize;
use serde_json::Value;

/// Inbound frame that carries a correlation id.
///
/// Exactly one of `result` / `error` is expected, but the frame is delivered
/// to the continuation whole so callers can apply their own policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseFrame {
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

/// JSON-RPC error member of a response frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// Inbound frame with no id, addressed by subscription instead.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationFrame {
    #[serde(default)]
    pub method: Option<String>,
    pub params: NotificationParams,
}

/// Parameters of a subscription notification.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationParams {
    pub subscription: u64,
    #[serde(default)]
    pub result: Option<Value>,
}
