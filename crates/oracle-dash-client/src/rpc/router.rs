/*
[INPUT]:  One raw inbound text frame
[OUTPUT]: Frame routed to the request registry or the subscription table
[POS]:    Protocol core - inbound message classification
[UPDATE]: When the routing discriminant or drop policy changes
*/

use std::sync::Mutex;

use serde_json::Value;
use tracing::warn;

use crate::types::{NotificationFrame, ResponseFrame};

use super::registry::RequestRegistry;
use super::subscriptions::SubscriptionTable;

/// Where a frame ended up. `Dropped` is the defensive outcome for frames
/// that violate the protocol; the message loop carries on regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Response { id: u64 },
    Notification { subscription: u64 },
    Dropped(DropReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Unparseable,
    NonIntegerId,
    UnmatchedResponse { id: u64 },
    MalformedNotification,
    UnknownSubscription { subscription: u64 },
}

/// Classify one decoded inbound frame and dispatch it.
///
/// Presence of an `id` member routes to response handling, absence to
/// notification handling. This binary split is the complete inbound
/// protocol state machine; a frame carrying `id` is a response even when it
/// structurally resembles a notification.
///
/// The subscription table is locked only on the notification path, so a
/// response continuation is free to register new subscriptions.
pub fn route_frame(
    raw: &str,
    registry: &mut RequestRegistry,
    subscriptions: &Mutex<SubscriptionTable>,
) -> Route {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, bytes = raw.len(), "dropping unparseable frame");
            return Route::Dropped(DropReason::Unparseable);
        }
    };

    if let Some(id_value) = value.get("id") {
        if id_value.as_u64().is_none() {
            // The service answers unparseable requests with `"id": null`;
            // there is no pending request such a frame could match.
            warn!(id = %id_value, "dropping response with non-integer id");
            return Route::Dropped(DropReason::NonIntegerId);
        }
        match serde_json::from_value::<ResponseFrame>(value) {
            Ok(frame) => {
                let id = frame.id;
                match registry.resolve(frame) {
                    Ok(()) => Route::Response { id },
                    Err(_) => Route::Dropped(DropReason::UnmatchedResponse { id }),
                }
            }
            Err(err) => {
                warn!(error = %err, "dropping malformed response frame");
                Route::Dropped(DropReason::Unparseable)
            }
        }
    } else {
        match serde_json::from_value::<NotificationFrame>(value) {
            Ok(frame) => {
                let subscription = frame.params.subscription;
                let mut table = subscriptions.lock().expect("subscription table lock");
                match table.dispatch(frame) {
                    Ok(()) => Route::Notification { subscription },
                    Err(_) => Route::Dropped(DropReason::UnknownSubscription { subscription }),
                }
            }
            Err(err) => {
                warn!(error = %err, "dropping malformed notification frame");
                Route::Dropped(DropReason::MalformedNotification)
            }
        }
    }
}
