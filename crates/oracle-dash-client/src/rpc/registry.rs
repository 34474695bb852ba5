/*
[INPUT]:  Outbound requests with continuations, inbound response frames
[OUTPUT]: Correlated continuation invocations, bounded identifier space
[POS]:    Protocol core - request/response correlation engine
[UPDATE]: When identifier lifecycle or timeout semantics change
*/

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{OracleError, Result};
use crate::transport::Transport;
use crate::types::ResponseFrame;

/// Protocol version stamped on every outbound request.
pub const JSON_RPC_VERSION: &str = "2.0";

/// Deadline applied to a pending request when no explicit timeout is set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What a continuation eventually receives: the full response frame, or a
/// timeout / disconnect error if no response ever arrives.
pub type Outcome = Result<ResponseFrame>;

/// One-shot callback stored per pending request.
pub type Continuation = Box<dyn FnOnce(Outcome) + Send>;

struct PendingRequest {
    method: String,
    continuation: Continuation,
    deadline: Instant,
}

/// Allocates correlation identifiers, tracks pending requests, and matches
/// inbound responses back to their continuations.
///
/// Identifiers released by `resolve` go onto a LIFO free list and are reused
/// before any fresh identifier is minted, so the identifier space stays
/// bounded by the high-water mark of concurrently outstanding requests.
/// Continuations live in this side table, never on the wire object.
pub struct RequestRegistry {
    pending: HashMap<u64, PendingRequest>,
    free: Vec<u64>,
    next_id: u64,
    request_timeout: Duration,
}

impl RequestRegistry {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            free: Vec::new(),
            next_id: 0,
            request_timeout,
        }
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether `id` is currently in flight.
    pub fn is_pending(&self, id: u64) -> bool {
        self.pending.contains_key(&id)
    }

    /// Assign an identifier, stamp the protocol version, serialize and hand
    /// the frame to the transport, then store the continuation against the
    /// identifier with a deadline.
    ///
    /// A transmit failure releases the identifier and surfaces the error to
    /// the caller synchronously; the continuation is dropped unused.
    pub fn send(
        &mut self,
        transport: &mut dyn Transport,
        method: &str,
        params: Option<Value>,
        continuation: Continuation,
    ) -> Result<u64> {
        let id = self.allocate_id();

        let mut frame = json!({
            "method": method,
            "id": id,
            "jsonrpc": JSON_RPC_VERSION,
        });
        if let Some(params) = params {
            frame["params"] = params;
        }

        if let Err(err) = transport.transmit(&frame.to_string()) {
            self.release_id(id);
            return Err(err);
        }

        let deadline = Instant::now() + self.request_timeout;
        self.pending.insert(
            id,
            PendingRequest {
                method: method.to_string(),
                continuation,
                deadline,
            },
        );
        debug!(id, method, "request sent");
        Ok(id)
    }

    /// Match a response to its pending request, release the identifier, and
    /// invoke the stored continuation exactly once with the full frame.
    ///
    /// A response with no live pending request is a protocol violation:
    /// logged and dropped, never allowed to take down the message loop.
    pub fn resolve(&mut self, response: ResponseFrame) -> Result<()> {
        let Some(entry) = self.pending.remove(&response.id) else {
            warn!(id = response.id, "dropping response with no pending request");
            return Err(OracleError::UnmatchedResponse { id: response.id });
        };

        // The identifier is reusable before the continuation runs, so a send
        // made from inside it picks the same identifier straight back up.
        self.release_id(response.id);
        debug!(id = response.id, method = %entry.method, "request resolved");
        (entry.continuation)(Ok(response));
        Ok(())
    }

    /// Expire pending requests whose deadline has passed, delivering a
    /// timeout error to each continuation and releasing their identifiers.
    /// Returns the number of requests expired.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let mut expired: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        expired.sort_unstable();

        for &id in &expired {
            if let Some(entry) = self.pending.remove(&id) {
                self.release_id(id);
                warn!(id, method = %entry.method, "request timed out");
                (entry.continuation)(Err(OracleError::RequestTimeout { id }));
            }
        }
        expired.len()
    }

    /// Abandon every pending request with a disconnect error and reset the
    /// identifier space. Called when the transport closes; the identifier
    /// space is per-connection.
    pub fn fail_all(&mut self) -> usize {
        let mut ids: Vec<u64> = self.pending.keys().copied().collect();
        ids.sort_unstable();

        for &id in &ids {
            if let Some(entry) = self.pending.remove(&id) {
                debug!(id, method = %entry.method, "abandoning request on disconnect");
                (entry.continuation)(Err(OracleError::NotConnected));
            }
        }
        self.free.clear();
        self.next_id = 0;
        ids.len()
    }

    fn allocate_id(&mut self) -> u64 {
        if let Some(id) = self.free.pop() {
            id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    fn release_id(&mut self, id: u64) {
        self.free.push(id);
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}
