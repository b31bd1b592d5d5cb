//! The mote entity.

use ms_core::{GatewayId, GeoPoint, MapCoord, MapProjection};

/// Whether a mote's route is being actively steered and evaluated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoteKind {
    /// Route is evaluated and may be extended with corrective hops.
    User,
    /// Passive sensor carrier; follows its path, nothing is charged.
    Sensor,
}

/// A downlink delivered to a mote, waiting to be consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub from:    GatewayId,
    pub payload: Vec<u8>,
}

/// A movable network device.
///
/// Configuration fields are `pub`; the path and position are private so the
/// reset/restore rules below cannot be bypassed:
///
/// - [`reset`](Self::reset) restores the configured path (dropping any hops
///   appended during the previous run) and puts the mote back on its first
///   waypoint.
/// - The position only changes through [`Environment::move_mote`][crate::Environment::move_mote]
///   or `reset`.
#[derive(Debug, Clone)]
pub struct Mote {
    pub eui:  u64,
    pub kind: MoteKind,
    pub enabled: bool,

    /// Waypoints per second.  Non-positive speeds never move.
    pub movement_speed: f64,

    /// The mote holds still until this many seconds into the run.  Negative
    /// values are treated by magnitude.
    pub start_movement_offset_secs: f64,

    /// First transmission, in seconds from tick 0.
    pub start_sending_offset_secs: u64,

    /// Seconds between transmissions.  0 disables transmissions.
    pub sending_period_secs: u64,

    /// Final goal for user motes whose path only covers part of the way.
    pub destination: Option<GeoPoint>,

    path:          Vec<GeoPoint>,
    original_path: Vec<GeoPoint>,
    position:      MapCoord,
    inbox:         Vec<Packet>,
    sent:          u64,
}

impl Mote {
    /// An enabled mote moving at 1 waypoint/s with no offsets and no
    /// transmissions.
    pub fn new(eui: u64, kind: MoteKind, path: Vec<GeoPoint>) -> Self {
        Self {
            eui,
            kind,
            enabled: true,
            movement_speed: 1.0,
            start_movement_offset_secs: 0.0,
            start_sending_offset_secs: 0,
            sending_period_secs: 0,
            destination: None,
            original_path: path.clone(),
            path,
            position: MapCoord::default(),
            inbox: Vec::new(),
            sent: 0,
        }
    }

    pub fn with_speed(mut self, waypoints_per_sec: f64) -> Self {
        self.movement_speed = waypoints_per_sec;
        self
    }

    pub fn with_movement_offset(mut self, secs: f64) -> Self {
        self.start_movement_offset_secs = secs;
        self
    }

    pub fn with_destination(mut self, destination: GeoPoint) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_sending(mut self, offset_secs: u64, period_secs: u64) -> Self {
        self.start_sending_offset_secs = offset_secs;
        self.sending_period_secs = period_secs;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_user(&self) -> bool {
        self.kind == MoteKind::User
    }

    #[inline]
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    #[inline]
    pub fn original_path(&self) -> &[GeoPoint] {
        &self.original_path
    }

    #[inline]
    pub fn position(&self) -> MapCoord {
        self.position
    }

    /// Minimum simulated milliseconds between two moves.
    pub fn step_interval_ms(&self) -> f64 {
        if self.movement_speed > 0.0 {
            1_000.0 / self.movement_speed
        } else {
            f64::INFINITY
        }
    }

    /// Simulated milliseconds the mote waits before its first move.
    pub fn movement_offset_ms(&self) -> f64 {
        self.start_movement_offset_secs.abs() * 1_000.0
    }

    /// `true` once the mote sits on its destination, or on the end of its
    /// path when it has no separate destination.
    pub fn is_arrived(&self, projection: &MapProjection) -> bool {
        match self.destination {
            Some(dest) => projection.to_map(dest) == self.position,
            None => match self.path.last() {
                None       => true,
                Some(&end) => projection.to_map(end) == self.position,
            },
        }
    }

    pub fn pending_packets(&self) -> usize {
        self.inbox.len()
    }

    /// Transmissions made since the last reset.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append `waypoint` to the current path.
    pub fn push_waypoint(&mut self, waypoint: GeoPoint) {
        self.path.push(waypoint);
    }

    /// Drain and return the inbox.
    pub fn consume_packets(&mut self) -> Vec<Packet> {
        std::mem::take(&mut self.inbox)
    }

    pub fn deliver(&mut self, packet: Packet) {
        self.inbox.push(packet);
    }

    pub(crate) fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub(crate) fn set_position(&mut self, position: MapCoord) {
        self.position = position;
    }

    /// Restore the configured path, move onto its first waypoint, and clear
    /// packet history.  A mote with an empty path is put on grid cell
    /// `[0, 0]`.
    pub fn reset(&mut self, projection: &MapProjection) {
        self.path = self.original_path.clone();
        self.position = match self.path.first() {
            Some(&start) => projection.to_map(start),
            None         => MapCoord::default(),
        };
        self.inbox.clear();
        self.sent = 0;
    }
}
