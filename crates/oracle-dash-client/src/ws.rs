/*
[INPUT]:  WebSocket URL of the oracle service
[OUTPUT]: Outbound Transport handle plus inbound frame/lifecycle events
[POS]:    Transport layer - WebSocket implementation of the message channel
[UPDATE]: When changing connection handling or frame delivery
*/

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{OracleError, Result};
use crate::transport::Transport;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Inbound side of the connection: text frames while it lives, one final
/// `Closed` when it ends. Connection establishment itself is the open
/// signal; `connect` returning `Ok` means frames may be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsEvent {
    Frame(String),
    Closed,
}

/// Outbound handle over the socket's writer half. Cheap to use from sync
/// code: frames go onto an unbounded channel drained by the pump task.
#[derive(Debug)]
pub struct WsTransport {
    outbound: mpsc::UnboundedSender<String>,
}

impl Transport for WsTransport {
    fn transmit(&mut self, frame: &str) -> Result<()> {
        self.outbound
            .send(frame.to_string())
            .map_err(|_| OracleError::NotConnected)
    }
}

/// Connect to the oracle service and spawn the socket pump.
///
/// The pump serializes all writes through one task and delivers inbound
/// text frames (and the final close) on the returned receiver. No
/// reconnection: when the socket dies the receiver yields `Closed` and the
/// transport starts failing fast.
pub async fn connect(url: &str) -> Result<(WsTransport, mpsc::Receiver<WsEvent>)> {
    let url = Url::parse(url)?;
    info!(%url, "connecting to oracle service");

    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|err| OracleError::Transport(err.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                outbound = outbound_rx.recv() => {
                    match outbound {
                        Some(frame) => {
                            if let Err(err) = write.send(WsMessage::Text(frame.into())).await {
                                warn!(error = %err, "websocket write failed");
                                break;
                            }
                        }
                        None => {
                            let _ = write.send(WsMessage::Close(None)).await;
                            break;
                        }
                    }
                }
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Close(_))) => {
                            let _ = write.send(WsMessage::Close(None)).await;
                            break;
                        }
                        Some(Ok(WsMessage::Ping(payload))) => {
                            let _ = write.send(WsMessage::Pong(payload)).await;
                        }
                        Some(Ok(WsMessage::Pong(_))) => {}
                        Some(Ok(WsMessage::Text(text))) => {
                            if event_tx.send(WsEvent::Frame(text.to_string())).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(other)) => {
                            debug!(?other, "ignoring non-text websocket message");
                        }
                        Some(Err(err)) => {
                            warn!(error = %err, "websocket read failed");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }
        let _ = event_tx.send(WsEvent::Closed).await;
        debug!("websocket pump finished");
    });

    Ok((WsTransport { outbound: outbound_tx }, event_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_invalid_url() {
        let err = connect("not a url").await.unwrap_err();
        assert!(matches!(err, OracleError::UrlParse(_)));
    }

    #[test]
    fn transmit_fails_fast_once_pump_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport { outbound: tx };
        drop(rx);
        let err = transport.transmit("{}").unwrap_err();
        assert!(matches!(err, OracleError::NotConnected));
    }
}
