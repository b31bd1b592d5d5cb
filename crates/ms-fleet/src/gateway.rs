//! Fixed network gateways that collect mote transmissions.

use ms_core::{GatewayId, GeoPoint, MoteId};

/// A stationary receiver.  Keeps only counters; payload decoding belongs to
/// the application layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Gateway {
    pub id:       GatewayId,
    pub position: GeoPoint,
    received:     u64,
    last_sender:  Option<MoteId>,
}

impl Gateway {
    pub fn new(id: GatewayId, position: GeoPoint) -> Self {
        Self { id, position, received: 0, last_sender: None }
    }

    /// Record an uplink from `mote`.
    pub fn receive(&mut self, mote: MoteId) {
        self.received += 1;
        self.last_sender = Some(mote);
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn last_sender(&self) -> Option<MoteId> {
        self.last_sender
    }

    /// Forget everything received in previous runs.
    pub fn reset(&mut self) {
        self.received = 0;
        self.last_sender = None;
    }
}
