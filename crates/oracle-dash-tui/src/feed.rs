/*
[INPUT]:  Oracle WebSocket connection + dashboard configuration
[OUTPUT]: Painted table rows + connection state notifications
[POS]:    Data layer - feed worker driving the protocol client
[UPDATE]: When changing startup flow, sweep timing, or shutdown semantics
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use oracle_dash_client::{
    ws, OracleClient, ProductEntry, RenderSink, Result, RowBinding, Transport, WsEvent,
};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::table::TableModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

/// Feed worker owning the protocol client for one connection.
///
/// All registry and subscription-table mutation is confined to this task:
/// frames, product-list results, and sweep ticks are funneled through one
/// select loop, so engine effects occur in arrival order. Reconnection is
/// out of scope; when the socket dies the feed reports `Disconnected` and
/// returns.
pub struct PriceFeed {
    config: DashboardConfig,
    table: Arc<Mutex<TableModel>>,
    connection_state: watch::Sender<ConnectionState>,
    shutdown: CancellationToken,
}

impl PriceFeed {
    pub fn new(
        config: DashboardConfig,
        table: Arc<Mutex<TableModel>>,
        shutdown: CancellationToken,
    ) -> (Self, watch::Receiver<ConnectionState>) {
        let (connection_state, state_rx) = watch::channel(ConnectionState::Connecting);
        (
            Self {
                config,
                table,
                connection_state,
                shutdown,
            },
            state_rx,
        )
    }

    pub async fn run(self) {
        let (transport, mut events) = match ws::connect(&self.config.ws_url).await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(url = %self.config.ws_url, error = %err, "oracle connection failed");
                let _ = self.connection_state.send(ConnectionState::Disconnected);
                return;
            }
        };

        let mut client = OracleClient::with_timeout(
            transport,
            Duration::from_secs(self.config.request_timeout_secs),
        );
        client.on_open();
        let _ = self.connection_state.send(ConnectionState::Connected);

        // First request on open: the product list drives everything else.
        let (products_tx, mut products_rx) = mpsc::unbounded_channel();
        if let Err(err) = client.get_product_list(move |result| {
            let _ = products_tx.send(result);
        }) {
            warn!(error = %err, "product list request failed");
        }

        let mut sweep = tokio::time::interval(Duration::from_secs(
            self.config.sweep_interval_secs.max(1),
        ));
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    client.on_close();
                    let _ = self.connection_state.send(ConnectionState::Disconnected);
                    break;
                }
                Some(result) = products_rx.recv() => {
                    match result {
                        Ok(products) => self.subscribe_products(&mut client, &products),
                        Err(err) => warn!(error = %err, "product list request rejected"),
                    }
                }
                event = events.recv() => {
                    match event {
                        Some(WsEvent::Frame(text)) => {
                            client.on_frame(&text);
                        }
                        Some(WsEvent::Closed) | None => {
                            warn!("oracle stream ended");
                            client.on_close();
                            let _ = self.connection_state.send(ConnectionState::Disconnected);
                            break;
                        }
                    }
                }
                _ = sweep.tick() => {
                    let expired = client.sweep();
                    if expired > 0 {
                        warn!(expired, "requests timed out");
                    }
                }
            }
        }
    }

    /// Build rows for the product list and issue one price subscription per
    /// price account. Each handler captures its row binding, so updates
    /// land without re-querying the product list.
    fn subscribe_products<T: Transport>(
        &self,
        client: &mut OracleClient<T>,
        products: &[ProductEntry],
    ) {
        let bindings = {
            let mut table = self.table.lock().expect("table lock");
            table.build_rows(products)
        };
        info!(products = products.len(), rows = bindings.len(), "product list loaded");

        for binding in bindings {
            let RowBinding {
                row,
                account,
                price_exponent,
            } = binding;
            let table = Arc::clone(&self.table);
            let subscribed: Result<u64> = client.subscribe_price(&account, move |update| {
                let mut table = table.lock().expect("table lock");
                match update.and_then(|update| update.project(price_exponent)) {
                    Ok(fields) => table.paint(row, &fields),
                    Err(err) => table.paint_error(row, &err),
                }
            });
            if let Err(err) = subscribed {
                warn!(%account, error = %err, "price subscription failed");
            }
        }
    }
}
