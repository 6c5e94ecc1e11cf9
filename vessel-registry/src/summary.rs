use std::fmt;

use fleet_simulator::kinematics::is_moving;
use strum::IntoEnumIterator;
use vessel_core::{ShipCategory, VesselMap};

/// Vessel counts of a published map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetSummary {
    pub vessels: usize,
    pub moving: usize,
    pub categories: Vec<(ShipCategory, usize)>,
}

impl FleetSummary {
    pub fn new(vessels: &VesselMap) -> FleetSummary {
        let mut categories: Vec<(ShipCategory, usize)> =
            ShipCategory::iter().map(|c| (c, 0)).collect();

        let mut moving = 0;
        for vessel in vessels.values() {
            if is_moving(vessel) {
                moving += 1;
            }
            let category = vessel.category();
            if let Some((_, count)) = categories.iter_mut().find(|(c, _)| *c == category) {
                *count += 1;
            }
        }

        FleetSummary {
            vessels: vessels.len(),
            moving,
            categories,
        }
    }

    pub fn count(&self, category: ShipCategory) -> usize {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

impl fmt::Display for FleetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (category, count) in self.categories.iter().filter(|(_, count)| *count > 0) {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{category}={count}")?;
            first = false;
        }
        Ok(())
    }
}
