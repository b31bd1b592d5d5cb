//! CSV fleet loader.
//!
//! # CSV format
//!
//! One row per point.  Rows for the same `eui` must repeat the same mote
//! settings; the first row for an `eui` defines them.  Motes are returned in
//! order of first appearance.
//!
//! ```csv
//! eui,kind,speed,movement_offset_secs,sending_offset_secs,sending_period_secs,point,lat,lon
//! 1,user,2.0,0,5,60,path,50.8700,4.7000
//! 1,user,2.0,0,5,60,path,50.8710,4.7000
//! 1,user,2.0,0,5,60,destination,50.8730,4.7000
//! 2,sensor,1.0,3,0,0,path,50.8700,4.7010
//! ```
//!
//! | Column  | Values                                                    |
//! |---------|-----------------------------------------------------------|
//! | `kind`  | `user` or `sensor`                                        |
//! | `point` | `path` (appended in row order) or `destination` (at most one) |

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use ms_core::GeoPoint;

use crate::{FleetError, FleetResult, Mote, MoteKind};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MoteRecord {
    eui:                  u64,
    kind:                 String,
    speed:                f64,
    movement_offset_secs: f64,
    sending_offset_secs:  u64,
    sending_period_secs:  u64,
    point:                String,
    lat:                  f64,
    lon:                  f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a fleet from a CSV file.
pub fn load_fleet_csv(path: &Path) -> FleetResult<Vec<Mote>> {
    let file = std::fs::File::open(path)?;
    load_fleet_reader(file)
}

/// Like [`load_fleet_csv`] but accepts any `Read` source (e.g. a
/// `std::io::Cursor` in tests).
pub fn load_fleet_reader<R: Read>(reader: R) -> FleetResult<Vec<Mote>> {
    // ── Parse CSV rows, grouped by eui in order of first appearance ───────
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut groups: Vec<Vec<MoteRecord>> = Vec::new();
    let mut by_eui: HashMap<u64, usize> = HashMap::new();

    for result in csv_reader.deserialize::<MoteRecord>() {
        let row = result.map_err(|e| FleetError::Parse(e.to_string()))?;
        let idx = *by_eui.entry(row.eui).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(row);
    }

    // ── Build one Mote per eui ────────────────────────────────────────────
    let motes = groups
        .into_iter()
        .map(build_mote)
        .collect::<FleetResult<Vec<Mote>>>()?;

    debug!(motes = motes.len(), "fleet loaded");
    Ok(motes)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_mote(rows: Vec<MoteRecord>) -> FleetResult<Mote> {
    let first = &rows[0];
    let eui   = first.eui;
    let kind  = parse_kind(&first.kind)?;

    let mut path        = Vec::with_capacity(rows.len());
    let mut destination = None;
    for row in &rows {
        let pos = GeoPoint::new(row.lat, row.lon);
        match row.point.trim() {
            "path" => path.push(pos),
            "destination" if destination.is_some() => {
                return Err(FleetError::Parse(format!(
                    "mote {eui} has more than one destination row"
                )));
            }
            "destination" => destination = Some(pos),
            other => {
                return Err(FleetError::Parse(format!(
                    "invalid point {other:?}: expected \"path\" or \"destination\""
                )));
            }
        }
    }

    let mut mote = Mote::new(eui, kind, path)
        .with_speed(first.speed)
        .with_movement_offset(first.movement_offset_secs)
        .with_sending(first.sending_offset_secs, first.sending_period_secs);
    mote.destination = destination;
    Ok(mote)
}

fn parse_kind(s: &str) -> FleetResult<MoteKind> {
    match s.trim() {
        "user"   => Ok(MoteKind::User),
        "sensor" => Ok(MoteKind::Sensor),
        other => Err(FleetError::Parse(format!(
            "invalid kind {other:?}: expected \"user\" or \"sensor\""
        ))),
    }
}
