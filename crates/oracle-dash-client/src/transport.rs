/*
[INPUT]:  Serialized outbound request frames
[OUTPUT]: Frames handed to the underlying message channel
[POS]:    Transport seam - abstract outbound boundary
[UPDATE]: When changing the outbound frame contract
*/

use crate::error::Result;

/// Outbound half of the bidirectional message channel.
///
/// The core only requires that a text frame can be handed off synchronously;
/// delivery happens elsewhere. Implementations must fail fast with
/// `OracleError::NotConnected` once the channel is gone rather than queue
/// silently.
pub trait Transport {
    fn transmit(&mut self, frame: &str) -> Result<()>;
}
