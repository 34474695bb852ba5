/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public oracle dashboard client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod decode;
pub mod error;
pub mod rpc;
pub mod sink;
pub mod transport;
pub mod types;
pub mod ws;

// Re-export commonly used types from rpc
pub use rpc::{
    Continuation,
    DropReason,
    OracleClient,
    Outcome,
    RequestRegistry,
    Route,
    SubscriptionTable,
};

// Re-export the error type and result alias
pub use error::{OracleError, Result};

// Re-export the transport seam
pub use transport::Transport;
pub use ws::{WsEvent, WsTransport};

// Re-export the rendering sink contract
pub use sink::{RenderSink, RowBinding};

// Re-export all wire types
pub use types::*;
