use crate::config::ZoneConfig;
use lidar_nav_data::{Sample, Scan, ZoneState};

/// Derives the zone occupancy of one scan.
///
/// Samples without a return (distance 0) or at or beyond `max_distance` are
/// ignored. Each zone is evaluated independently over the remaining samples.
pub fn classify(scan: &Scan, zones: &ZoneConfig) -> ZoneState {
    let mut state = ZoneState::default();
    for sample in scan.iter().filter(|s| in_range(s, zones)) {
        state.front |= in_front(sample, zones) && sample.distance_mm < zones.safe_distance;
        state.left |= in_band(sample.angle_degree, zones.left_band)
            && sample.distance_mm < zones.side_threshold;
        state.right |= in_band(sample.angle_degree, zones.right_band)
            && sample.distance_mm < zones.side_threshold;
    }
    state
}

fn in_range(sample: &Sample, zones: &ZoneConfig) -> bool {
    0. < sample.distance_mm && sample.distance_mm < zones.max_distance
}

fn in_front(sample: &Sample, zones: &ZoneConfig) -> bool {
    sample.angle_degree <= zones.front_half_width
        || sample.angle_degree >= 360. - zones.front_half_width
}

fn in_band(angle_degree: f64, (low, high): (f64, f64)) -> bool {
    low <= angle_degree && angle_degree <= high
}
