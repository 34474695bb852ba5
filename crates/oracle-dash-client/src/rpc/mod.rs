/*
[INPUT]:  Outbound requests and raw inbound frames
[OUTPUT]: Correlated responses and dispatched subscription notifications
[POS]:    Protocol core - correlation and dispatch engines
[UPDATE]: When the JSON-RPC engine or dispatch semantics change
*/

pub mod client;
pub mod registry;
pub mod router;
pub mod subscriptions;

pub use client::OracleClient;
pub use registry::{Continuation, Outcome, RequestRegistry, DEFAULT_REQUEST_TIMEOUT};
pub use router::{DropReason, Route};
pub use subscriptions::{NotificationHandler, SubscriptionTable};
