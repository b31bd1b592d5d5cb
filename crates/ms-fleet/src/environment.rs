//! The simulated world: motes, gateways, navigation graph, map projection,
//! and the trigger clock.

use ms_core::{Clock, GatewayId, GeoPoint, MapCoord, MapProjection, MoteId, SimClock, Tick};
use ms_spatial::WaypointGraph;
use tracing::trace;

use crate::{FleetError, FleetResult, Gateway, Mote};

/// Events the environment schedules on its clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvEvent {
    /// Periodic uplink from a mote to its nearest gateway.  Only the
    /// gateway's counters and the mote's sent count change; nothing is
    /// delivered back to the mote's inbox.
    Transmit(MoteId),
}

/// Owns every entity of one simulated world.
///
/// Motes and gateways are addressed by index (`MoteId`, `GatewayId`); ids
/// stay valid for the lifetime of the environment.
pub struct Environment {
    /// Navigation graph the motes' paths are laid on.
    pub graph: WaypointGraph,

    /// Geographic → grid projection used for all position comparisons.
    pub projection: MapProjection,

    motes:    Vec<Mote>,
    gateways: Vec<Gateway>,
    clock:    Clock<EnvEvent>,
}

impl Environment {
    pub fn new(graph: WaypointGraph, projection: MapProjection, clock: SimClock) -> Self {
        Self {
            graph,
            projection,
            motes:    Vec::new(),
            gateways: Vec::new(),
            clock:    Clock::new(clock),
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add `mote`, placing it on the first waypoint of its path.
    pub fn add_mote(&mut self, mut mote: Mote) -> MoteId {
        let id = MoteId(self.motes.len() as u32);
        mote.reset(&self.projection);
        self.motes.push(mote);
        id
    }

    pub fn add_gateway(&mut self, position: GeoPoint) -> GatewayId {
        let id = GatewayId(self.gateways.len() as u32);
        self.gateways.push(Gateway::new(id, position));
        id
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn motes_mut(&mut self) -> &mut [Mote] {
        &mut self.motes
    }

    pub fn mote_ids(&self) -> impl Iterator<Item = MoteId> + '_ {
        (0..self.motes.len() as u32).map(MoteId)
    }

    pub fn mote(&self, id: MoteId) -> FleetResult<&Mote> {
        self.motes.get(id.index()).ok_or(FleetError::MoteNotFound(id))
    }

    pub fn mote_mut(&mut self, id: MoteId) -> FleetResult<&mut Mote> {
        self.motes.get_mut(id.index()).ok_or(FleetError::MoteNotFound(id))
    }

    pub fn gateways(&self) -> &[Gateway] {
        &self.gateways
    }

    pub fn gateways_mut(&mut self) -> &mut [Gateway] {
        &mut self.gateways
    }

    pub fn clock(&self) -> &Clock<EnvEvent> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock<EnvEvent> {
        &mut self.clock
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    #[inline]
    pub fn to_map(&self, pos: GeoPoint) -> MapCoord {
        self.projection.to_map(pos)
    }

    // ── World mutation ────────────────────────────────────────────────────

    /// Teleport `mote` onto `pos` (snapped to the map grid).
    pub fn move_mote(&mut self, mote: MoteId, pos: GeoPoint) -> FleetResult<()> {
        let cell = self.projection.to_map(pos);
        self.mote_mut(mote)?.set_position(cell);
        Ok(())
    }

    /// `true` when every enabled mote has reached its destination.
    pub fn all_motes_arrived(&self) -> bool {
        self.motes
            .iter()
            .all(|m| !m.enabled || m.is_arrived(&self.projection))
    }

    /// Register the first transmission trigger of every mote that sends,
    /// `start_sending_offset_secs` after the current tick.
    pub fn schedule_transmissions(&mut self) {
        let time = self.clock.time().clone();
        let now  = time.current_tick;
        for (i, mote) in self.motes.iter().enumerate() {
            if mote.sending_period_secs == 0 {
                continue;
            }
            let at = now + time.ticks_for_secs(mote.start_sending_offset_secs);
            self.clock.add_trigger(at, EnvEvent::Transmit(MoteId(i as u32)));
        }
    }

    /// Advance the clock `n` ticks and handle every trigger that comes due.
    ///
    /// Returns the number of events fired.
    pub fn advance(&mut self, n: u64) -> usize {
        // Split borrow: the clock is driven while the handler touches motes
        // and gateways.
        let Self { clock, motes, gateways, projection, .. } = self;
        let time = clock.time().clone();

        clock.tick(n, |now, event| match *event {
            EnvEvent::Transmit(id) => {
                let mote = motes.get_mut(id.index())?;
                if mote.enabled {
                    let here = projection.to_geo(mote.position());
                    if let Some(gw) = nearest_gateway(gateways, here) {
                        gw.receive(id);
                        mote.record_sent();
                        trace!(%now, mote = %id, gateway = %gw.id, "uplink");
                    }
                }
                Some(now + time.ticks_for_secs(mote.sending_period_secs).max(1))
            }
        })
    }

    /// Put every mote back on the start of its configured path.
    pub fn reset_motes(&mut self) {
        let projection = self.projection;
        for mote in &mut self.motes {
            mote.reset(&projection);
        }
    }

    /// Forget everything that happened in earlier runs: rewind the clock,
    /// drop queued triggers, and clear gateway and mote packet history.
    pub fn reset_history(&mut self) {
        self.clock.reset();
        for gw in &mut self.gateways {
            gw.reset();
        }
        for mote in &mut self.motes {
            mote.consume_packets();
        }
    }
}

fn nearest_gateway(gateways: &mut [Gateway], pos: GeoPoint) -> Option<&mut Gateway> {
    gateways.iter_mut().min_by(|a, b| {
        a.position
            .distance_m(pos)
            .total_cmp(&b.position.distance_m(pos))
    })
}
