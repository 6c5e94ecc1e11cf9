//! Merges single stream messages into the per-vessel fragments buffered between
//! publish ticks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use vessel_core::{
    Dimensions, Mmsi, NavigationStatus, Vessel, VesselFragment, VesselMap, format_eta,
    is_valid_fix,
};

use crate::models::{AisMessage, MetaData, ParsedMessage, PositionReport, ShipStaticData};

/// Fragments learned since the last publish tick, owned exclusively by the stream client
/// until [FragmentBuffer::take] hands them to the publisher.
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    fragments: HashMap<Mmsi, VesselFragment>,
    processed: u64,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn known_name(existing: Option<&VesselFragment>, published: Option<&Vessel>) -> Option<String> {
    existing
        .and_then(|f| f.name.clone())
        .or_else(|| published.map(|v| v.name.clone()).filter(|n| !n.is_empty()))
}

/// Returns the updated fragment, or `None` if the report carries no usable position.
pub fn reconcile_position(
    existing: Option<&VesselFragment>,
    published: Option<&Vessel>,
    meta: &MetaData,
    report: &PositionReport,
    now: DateTime<Utc>,
) -> Option<VesselFragment> {
    let (Some(latitude), Some(longitude)) = (report.latitude, report.longitude) else {
        return None;
    };
    if !is_valid_fix(latitude, longitude) {
        return None;
    }

    let mut fragment = existing.cloned().unwrap_or_default();

    if known_name(existing, published).is_none() {
        fragment.name = non_empty(meta.ship_name.as_deref());
    }
    fragment.latitude = Some(latitude);
    fragment.longitude = Some(longitude);
    fragment.speed_over_ground = report.speed_over_ground;
    fragment.course_over_ground = report.course_over_ground;
    fragment.true_heading = report.true_heading;
    fragment.navigation_status = report
        .navigation_status_code()
        .map(NavigationStatus::from_code);
    fragment.last_update = Some(now);

    Some(fragment)
}

/// Static reports are always accepted. The coarse metadata position is only used when
/// neither the buffered fragment nor the published vessel has a position yet.
pub fn reconcile_static(
    existing: Option<&VesselFragment>,
    published: Option<&Vessel>,
    meta: &MetaData,
    data: &ShipStaticData,
    now: DateTime<Utc>,
) -> VesselFragment {
    let mut fragment = existing.cloned().unwrap_or_default();

    fragment.name = non_empty(data.name.as_deref())
        .or_else(|| existing.and_then(|f| f.name.clone()))
        .or_else(|| non_empty(meta.ship_name.as_deref()));
    fragment.ship_type = data.ship_type;
    fragment.call_sign = Some(non_empty(data.call_sign.as_deref()).unwrap_or_default());
    fragment.imo_number = data.imo_number;
    fragment.destination = Some(non_empty(data.destination.as_deref()).unwrap_or_default());
    fragment.draught = data.draught;
    fragment.eta = Some(
        data.eta
            .map(|e| format_eta(e.month, e.day, e.hour, e.minute))
            .unwrap_or_default(),
    );
    fragment.dimensions = Some(
        data.dimension
            .map(|d| Dimensions {
                bow: d.a,
                stern: d.b,
                port: d.c,
                starboard: d.d,
            })
            .unwrap_or_default(),
    );

    let has_position = (fragment.latitude.is_some() && fragment.longitude.is_some())
        || published.is_some_and(Vessel::has_fix);

    if !has_position {
        if let (Some(latitude), Some(longitude)) = (meta.latitude, meta.longitude) {
            if is_valid_fix(latitude, longitude) {
                fragment.latitude = Some(latitude);
                fragment.longitude = Some(longitude);
            }
        }
    }

    fragment.last_update = Some(now);
    fragment
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, mmsi: &Mmsi) -> Option<&VesselFragment> {
        self.fragments.get(mmsi)
    }

    /// Total number of messages that updated a fragment.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Returns true if the message updated the buffered fragment of its vessel.
    pub fn apply(&mut self, message: &ParsedMessage, published: &VesselMap, now: DateTime<Utc>) -> bool {
        let ParsedMessage {
            mmsi,
            meta_data,
            message,
        } = message;

        let existing = self.fragments.get(mmsi);
        let previous = published.get(mmsi);

        let fragment = match message {
            AisMessage::Position(report) => {
                match reconcile_position(existing, previous, meta_data, report, now) {
                    Some(f) => f,
                    None => {
                        debug!(%mmsi, "discarded position report without a valid fix");
                        return false;
                    }
                }
            }
            AisMessage::Static(data) => reconcile_static(existing, previous, meta_data, data, now),
            AisMessage::Unsupported => return false,
        };

        self.fragments.insert(*mmsi, fragment);
        self.processed += 1;
        true
    }

    /// Hands the buffered fragments over and leaves an empty buffer behind.
    pub fn take(&mut self) -> HashMap<Mmsi, VesselFragment> {
        std::mem::take(&mut self.fragments)
    }
}
