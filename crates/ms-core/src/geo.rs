//! Geographic coordinates and their projection onto the discrete map grid.
//!
//! Waypoints are stored as WGS-84 [`GeoPoint`]s.  Mote positions are kept on
//! an integer grid ([`MapCoord`]) so "is the mote on this waypoint?" is an
//! exact comparison rather than a float tolerance check.  [`MapProjection`]
//! converts between the two.

use crate::{CoreError, CoreResult};

/// Metres per degree of latitude (mean Earth radius).
const METRES_PER_DEG: f64 = 111_320.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── MapCoord ──────────────────────────────────────────────────────────────────

/// A discretized position on the map grid.  `x` grows eastward, `y`
/// northward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapCoord {
    pub x: i32,
    pub y: i32,
}

impl MapCoord {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for MapCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── MapProjection ─────────────────────────────────────────────────────────────

/// Equirectangular projection from [`GeoPoint`] to a grid of square cells.
///
/// Accurate to well under one cell for maps spanning a few kilometres, which
/// is the scale motes operate at.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapProjection {
    /// Geographic position of grid cell `[0, 0]`.
    pub origin: GeoPoint,
    /// Side length of one grid cell in metres.
    pub cell_m: f64,
}

impl MapProjection {
    /// Build a projection, rejecting non-positive cell sizes.
    pub fn new(origin: GeoPoint, cell_m: f64) -> CoreResult<Self> {
        if !(cell_m > 0.0) {
            return Err(CoreError::Config(format!(
                "map cell size must be positive, got {cell_m}"
            )));
        }
        Ok(Self { origin, cell_m })
    }

    #[inline]
    fn metres_per_deg_lon(&self) -> f64 {
        METRES_PER_DEG * self.origin.lat.to_radians().cos()
    }

    /// Project `pos` onto the grid (nearest cell).
    pub fn to_map(&self, pos: GeoPoint) -> MapCoord {
        let east_m  = (pos.lon - self.origin.lon) * self.metres_per_deg_lon();
        let north_m = (pos.lat - self.origin.lat) * METRES_PER_DEG;
        MapCoord {
            x: (east_m / self.cell_m).round() as i32,
            y: (north_m / self.cell_m).round() as i32,
        }
    }

    /// Geographic position of the centre of `cell`.
    pub fn to_geo(&self, cell: MapCoord) -> GeoPoint {
        GeoPoint {
            lat: self.origin.lat + cell.y as f64 * self.cell_m / METRES_PER_DEG,
            lon: self.origin.lon + cell.x as f64 * self.cell_m / self.metres_per_deg_lon(),
        }
    }
}

impl Default for MapProjection {
    /// One-metre cells anchored at (0, 0).
    fn default() -> Self {
        Self { origin: GeoPoint::new(0.0, 0.0), cell_m: 1.0 }
    }
}
