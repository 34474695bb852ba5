/*
[INPUT]:  Injected transport, caller requests, raw inbound frames
[OUTPUT]: Correlated responses, registered price subscriptions
[POS]:    Protocol core - client object tying registry, table, transport
[UPDATE]: When the client surface or lifecycle semantics change
*/

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{OracleError, Result};
use crate::transport::Transport;
use crate::types::{NotificationFrame, PriceUpdate, ProductEntry, SubscribeAck};

use super::registry::{Continuation, Outcome, RequestRegistry, DEFAULT_REQUEST_TIMEOUT};
use super::router::{self, Route};
use super::subscriptions::SubscriptionTable;

pub const METHOD_GET_PRODUCT_LIST: &str = "get_product_list";
pub const METHOD_SUBSCRIBE_PRICE: &str = "subscribe_price";

/// JSON-RPC client for one oracle connection.
///
/// Constructed with its transport injected, so multiple independent
/// connections coexist and tests run against a mock channel. All mutation
/// happens through `&mut self`; confine the client to one task or wrap it
/// in explicit mutual exclusion.
pub struct OracleClient<T: Transport> {
    transport: T,
    registry: RequestRegistry,
    subscriptions: Arc<Mutex<SubscriptionTable>>,
    connected: bool,
}

impl<T: Transport> OracleClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(transport: T, request_timeout: Duration) -> Self {
        Self {
            transport,
            registry: RequestRegistry::new(request_timeout),
            subscriptions: Arc::new(Mutex::new(SubscriptionTable::new())),
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of requests awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.registry.pending_len()
    }

    /// Connection established; requests may flow.
    pub fn on_open(&mut self) {
        self.connected = true;
        info!("oracle connection open");
    }

    /// Connection gone: every pending request is abandoned with a
    /// disconnect error and the subscription table is cleared. Subsequent
    /// sends fail fast.
    pub fn on_close(&mut self) {
        self.connected = false;
        let abandoned = self.registry.fail_all();
        let mut table = self.subscriptions.lock().expect("subscription table lock");
        let subscriptions = table.len();
        *table = SubscriptionTable::new();
        info!(abandoned, subscriptions, "oracle connection closed");
    }

    /// Issue a raw JSON-RPC request. The continuation runs later, on the
    /// matching inbound response (or timeout / disconnect).
    pub fn request(
        &mut self,
        method: &str,
        params: Option<Value>,
        continuation: Continuation,
    ) -> Result<u64> {
        if !self.connected {
            return Err(OracleError::NotConnected);
        }
        self.registry
            .send(&mut self.transport, method, params, continuation)
    }

    /// Fetch the product list, decoding the result for the continuation.
    pub fn get_product_list<F>(&mut self, continuation: F) -> Result<u64>
    where
        F: FnOnce(Result<Vec<ProductEntry>>) + Send + 'static,
    {
        self.request(
            METHOD_GET_PRODUCT_LIST,
            None,
            Box::new(move |outcome| continuation(decode_result(outcome))),
        )
    }

    /// Subscribe to price updates for one price account.
    ///
    /// The server assigns the subscription id in its acknowledgement; the
    /// handler is registered lazily when that acknowledgement arrives.
    /// Subscription failure is delivered to the handler once as an error.
    pub fn subscribe_price<F>(&mut self, account: &str, mut handler: F) -> Result<u64>
    where
        F: FnMut(Result<PriceUpdate>) + Send + 'static,
    {
        let subscriptions = Arc::clone(&self.subscriptions);
        let account = account.to_string();
        let params = json!({ "account": account });

        self.request(
            METHOD_SUBSCRIBE_PRICE,
            Some(params),
            Box::new(move |outcome| match decode_result::<SubscribeAck>(outcome) {
                Ok(ack) => {
                    let mut table = subscriptions.lock().expect("subscription table lock");
                    table.register(
                        ack.subscription,
                        Box::new(move |frame| handler(decode_price_update(frame))),
                    );
                }
                Err(err) => {
                    warn!(%account, error = %err, "price subscription rejected");
                    handler(Err(err));
                }
            }),
        )
    }

    /// Process one inbound frame to completion, including all downstream
    /// handler invocation, before the caller hands over the next.
    pub fn on_frame(&mut self, raw: &str) -> Route {
        router::route_frame(raw, &mut self.registry, &self.subscriptions)
    }

    /// Expire pending requests that outlived the request timeout.
    pub fn sweep(&mut self) -> usize {
        self.registry.sweep(Instant::now())
    }
}

/// Unwrap a response frame into its decoded `result`, converting a server
/// `error` member into `OracleError::Rpc`.
fn decode_result<R: DeserializeOwned>(outcome: Outcome) -> Result<R> {
    let frame = outcome?;
    if let Some(error) = frame.error {
        return Err(OracleError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    let result = frame.result.ok_or(OracleError::MissingField("result"))?;
    Ok(serde_json::from_value(result)?)
}

fn decode_price_update(frame: NotificationFrame) -> Result<PriceUpdate> {
    let result = frame
        .params
        .result
        .ok_or(OracleError::MissingField("params.result"))?;
    Ok(serde_json::from_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::router::DropReason;
    use crate::types::SymbolStatus;

    #[derive(Clone, Default)]
    struct SharedTransport {
        frames: Arc<Mutex<Vec<Value>>>,
    }

    impl SharedTransport {
        fn sent(&self) -> Vec<Value> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl Transport for SharedTransport {
        fn transmit(&mut self, frame: &str) -> Result<()> {
            self.frames
                .lock()
                .unwrap()
                .push(serde_json::from_str(frame).unwrap());
            Ok(())
        }
    }

    fn open_client() -> (OracleClient<SharedTransport>, SharedTransport) {
        let transport = SharedTransport::default();
        let mut client = OracleClient::new(transport.clone());
        client.on_open();
        (client, transport)
    }

    #[test]
    fn request_fails_fast_when_not_connected() {
        let transport = SharedTransport::default();
        let mut client = OracleClient::new(transport);
        let err = client
            .request("ping", None, Box::new(|_| {}))
            .unwrap_err();
        assert!(matches!(err, OracleError::NotConnected));
    }

    #[test]
    fn subscribe_ack_registers_handler_for_notifications() {
        let (mut client, transport) = open_client();

        let updates: Arc<Mutex<Vec<Result<PriceUpdate>>>> = Arc::new(Mutex::new(Vec::new()));
        let updates_in = Arc::clone(&updates);
        let id = client
            .subscribe_price("GVXRSBjFk6e6J3NbVPXohDJetcTjaeeuykUpbQF8UoMU", move |update| {
                updates_in.lock().unwrap().push(update)
            })
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0]["method"], "subscribe_price");
        assert_eq!(
            sent[0]["params"]["account"],
            "GVXRSBjFk6e6J3NbVPXohDJetcTjaeeuykUpbQF8UoMU"
        );

        // Acknowledgement assigns subscription 7.
        let ack = format!(r#"{{"id": {id}, "result": {{"subscription": 7}}}}"#);
        assert_eq!(client.on_frame(&ack), Route::Response { id });

        let notify = r#"{
            "method": "notify_price",
            "params": {
                "subscription": 7,
                "result": {
                    "price": 868725, "conf": 102, "status": "trading",
                    "valid_slot": 32008, "pub_slot": 32009
                }
            }
        }"#;
        assert_eq!(client.on_frame(notify), Route::Notification { subscription: 7 });

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let update = updates[0].as_ref().unwrap();
        assert_eq!(update.price, 868725);
        assert_eq!(update.status, SymbolStatus::Trading);
    }

    #[test]
    fn subscribe_rejection_reaches_the_handler_once() {
        let (mut client, _transport) = open_client();

        let updates: Arc<Mutex<Vec<Result<PriceUpdate>>>> = Arc::new(Mutex::new(Vec::new()));
        let updates_in = Arc::clone(&updates);
        let id = client
            .subscribe_price("BadAccount", move |update| {
                updates_in.lock().unwrap().push(update)
            })
            .unwrap();

        let rejection = format!(
            r#"{{"id": {id}, "error": {{"code": -32602, "message": "unknown symbol"}}}}"#
        );
        client.on_frame(&rejection);

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            updates[0],
            Err(OracleError::Rpc { code: -32602, .. })
        ));
    }

    #[test]
    fn notification_before_ack_is_dropped_then_delivered_after_ack() {
        let (mut client, _transport) = open_client();

        let updates: Arc<Mutex<Vec<Result<PriceUpdate>>>> = Arc::new(Mutex::new(Vec::new()));
        let updates_in = Arc::clone(&updates);
        let id = client
            .subscribe_price("SomeAccount", move |update| {
                updates_in.lock().unwrap().push(update)
            })
            .unwrap();

        let notify = r#"{
            "method": "notify_price",
            "params": {
                "subscription": 0,
                "result": {
                    "price": 1, "conf": 1, "status": "trading",
                    "valid_slot": 1, "pub_slot": 1
                }
            }
        }"#;

        // Out-of-order race: update arrives before the acknowledgement.
        assert_eq!(
            client.on_frame(notify),
            Route::Dropped(DropReason::UnknownSubscription { subscription: 0 })
        );
        assert!(updates.lock().unwrap().is_empty());

        let ack = format!(r#"{{"id": {id}, "result": {{"subscription": 0}}}}"#);
        client.on_frame(&ack);
        client.on_frame(notify);
        assert_eq!(updates.lock().unwrap().len(), 1);
    }

    #[test]
    fn malformed_update_surfaces_as_handler_error() {
        let (mut client, _transport) = open_client();

        let updates: Arc<Mutex<Vec<Result<PriceUpdate>>>> = Arc::new(Mutex::new(Vec::new()));
        let updates_in = Arc::clone(&updates);
        let id = client
            .subscribe_price("SomeAccount", move |update| {
                updates_in.lock().unwrap().push(update)
            })
            .unwrap();

        let ack = format!(r#"{{"id": {id}, "result": {{"subscription": 1}}}}"#);
        client.on_frame(&ack);

        // No result member at all.
        let notify = r#"{"method": "notify_price", "params": {"subscription": 1}}"#;
        client.on_frame(notify);

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            updates[0],
            Err(OracleError::MissingField("params.result"))
        ));
    }

    #[test]
    fn close_abandons_pending_and_clears_subscriptions() {
        let (mut client, _transport) = open_client();

        let outcomes: Arc<Mutex<Vec<Outcome>>> = Arc::new(Mutex::new(Vec::new()));
        let outcomes_in = Arc::clone(&outcomes);
        client
            .request(
                "ping",
                None,
                Box::new(move |outcome| outcomes_in.lock().unwrap().push(outcome)),
            )
            .unwrap();

        client.on_close();
        assert_eq!(client.pending_requests(), 0);
        assert!(matches!(
            outcomes.lock().unwrap()[0],
            Err(OracleError::NotConnected)
        ));

        let err = client.request("ping", None, Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, OracleError::NotConnected));
    }
}
