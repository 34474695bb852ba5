/*
[INPUT]:  Server-assigned subscription ids and registered update handlers
[OUTPUT]: Notifications dispatched to the matching handler
[POS]:    Protocol core - subscription dispatch engine
[UPDATE]: When registration or dispatch semantics change
*/

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{OracleError, Result};
use crate::types::NotificationFrame;

/// Callback invoked for every notification on one subscription.
pub type NotificationHandler = Box<dyn FnMut(NotificationFrame) + Send>;

/// Maps server-assigned subscription ids to update handlers.
///
/// The id space is the server's: sparse, not contiguous, and acknowledgement
/// order for concurrently issued subscribes is unconstrained. A map keyed by
/// id makes out-of-order registration a non-issue. Slots live for the life
/// of the connection; there is no unsubscribe.
#[derive(Default)]
pub struct SubscriptionTable {
    handlers: HashMap<u64, NotificationHandler>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Register the handler for a subscription id, normally exactly once per
    /// subscribe acknowledgement. A duplicate registration is a protocol
    /// violation; the new handler replaces the old with a warning.
    pub fn register(&mut self, subscription: u64, handler: NotificationHandler) {
        if self.handlers.insert(subscription, handler).is_some() {
            warn!(subscription, "subscription registered twice; handler replaced");
        } else {
            debug!(subscription, "subscription registered");
        }
    }

    /// Invoke the handler registered for the notification's subscription id.
    ///
    /// An unregistered id means either the acknowledgement has not been
    /// processed yet or the server sent a malformed frame; the update is
    /// dropped, never fatal.
    pub fn dispatch(&mut self, notification: NotificationFrame) -> Result<()> {
        let subscription = notification.params.subscription;
        let Some(handler) = self.handlers.get_mut(&subscription) else {
            debug!(subscription, "dropping notification for unregistered subscription");
            return Err(OracleError::UnknownSubscription { subscription });
        };
        handler(notification);
        Ok(())
    }
}
