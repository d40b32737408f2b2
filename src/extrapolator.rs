//! Dead-reckoning of aircraft between authoritative updates.

use crate::airspace::AirspaceHandle;
use crate::geometry;
use crate::thread_manager::SteppableTask;
use crate::types::{GeoPoint, ICAOAddress, TrackedEntity};

/// Knots per metre-per-second.
pub const KNOTS_PER_METRE_PER_SECOND: f64 = 1.944;
pub const REFERENCE_TICK: std::time::Duration = std::time::Duration::from_millis(100);
// Speed divisor that yields metres per reference tick.
const REFERENCE_TICK_DIVISOR: f64 = KNOTS_PER_METRE_PER_SECOND * 5.0;

/// Motion terms fixed at the time of an authoritative update.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DeadReckoning {
    heading_radians: f64,
    metres_per_tick: f64,
}

impl DeadReckoning {
    /// Returns `None` for a stationary aircraft, which needs no timer.
    #[must_use]
    pub fn new(heading: f64, ground_speed: f64, tick: std::time::Duration) -> Option<Self> {
        if !(ground_speed.is_finite() && ground_speed > 0.0) || tick.is_zero() {
            return None;
        }
        let tick_scale = tick.as_secs_f64() / REFERENCE_TICK.as_secs_f64();
        Some(DeadReckoning {
            heading_radians: heading.to_radians(),
            metres_per_tick: ground_speed / REFERENCE_TICK_DIVISOR * tick_scale,
        })
    }

    #[must_use]
    pub fn for_aircraft(aircraft: &TrackedEntity, tick: std::time::Duration) -> Option<Self> {
        DeadReckoning::new(aircraft.heading, aircraft.ground_speed, tick)
    }

    #[must_use]
    pub fn metres_per_tick(&self) -> f64 {
        self.metres_per_tick
    }

    #[must_use]
    pub fn advance(&self, position: GeoPoint) -> GeoPoint {
        geometry::project(position, self.heading_radians, self.metres_per_tick)
    }
}

/// Timer task moving one aircraft in the shared airspace every tick.
pub struct ExtrapolationTask {
    icao_address: ICAOAddress,
    motion: DeadReckoning,
    airspace: AirspaceHandle,
}

impl ExtrapolationTask {
    #[must_use]
    pub fn new(icao_address: ICAOAddress, motion: DeadReckoning, airspace: AirspaceHandle) -> Self {
        ExtrapolationTask {
            icao_address,
            motion,
            airspace,
        }
    }
}

impl SteppableTask for ExtrapolationTask {
    fn step(&mut self) -> bool {
        let mut airspace = self.airspace.write();
        let Some(aircraft) = airspace.get_mut(self.icao_address) else {
            log::debug!("Extrapolator: {} no longer tracked", self.icao_address);
            return false;
        };
        aircraft.position = self.motion.advance(aircraft.position);
        true
    }
}
