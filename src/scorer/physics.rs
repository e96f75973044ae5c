use crate::consts::EARTH_RADIUS_M;
use crate::geometry::Cell;

/// Geometric relationship between a target sector and one neighbor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SectorInteraction {
    pub distance: f64,
    pub azimuth_diff: f64,
    /// 1.0 facing, 0.2 back-to-back.
    pub interference: f64,
    pub overlap: f64,
    pub is_overlapping: bool,
    pub is_colocated: bool,
}

impl SectorInteraction {
    #[inline(always)]
    pub fn is_back_to_back(&self) -> bool {
        self.azimuth_diff > 135.0 && self.azimuth_diff < 225.0 && !self.is_overlapping
    }
}

/// Haversine great-circle distance in meters.
pub fn distance(a: &Cell, b: &Cell) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Absolute boresight difference folded into 0..=180.
pub fn azimuth_diff(a: &Cell, b: &Cell) -> f64 {
    let diff = (a.effective_azimuth() - b.effective_azimuth()).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

pub fn interference_factor(azimuth_diff: f64) -> f64 {
    if azimuth_diff < 45.0 {
        1.0
    } else if azimuth_diff < 90.0 {
        0.7
    } else if azimuth_diff < 135.0 {
        0.4
    } else {
        0.2
    }
}

#[inline(always)]
fn normalize_deg(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Inclusive arc containment. Arcs with `start > end` wrap through north.
#[inline(always)]
fn in_arc(angle: f64, start: f64, end: f64) -> bool {
    if start <= end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    }
}

/// True when either boresight lies inside the other sector's arc, or the
/// first sector's arc edges fall inside the second's.
pub fn sectors_overlap(a: &Cell, b: &Cell) -> bool {
    let az_a = normalize_deg(a.effective_azimuth());
    let az_b = normalize_deg(b.effective_azimuth());
    let half_a = a.effective_beamwidth() / 2.0;
    let half_b = b.effective_beamwidth() / 2.0;

    let a_start = normalize_deg(az_a - half_a);
    let a_end = normalize_deg(az_a + half_a);
    let b_start = normalize_deg(az_b - half_b);
    let b_end = normalize_deg(az_b + half_b);

    in_arc(az_a, b_start, b_end)
        || in_arc(az_b, a_start, a_end)
        || in_arc(a_start, b_start, b_end)
        || in_arc(a_end, b_start, b_end)
}

/// Fraction of the average beamwidth shared by the two boresights, 0..=1.
pub fn overlap_fraction(a: &Cell, b: &Cell) -> f64 {
    let diff = azimuth_diff(a, b);
    let avg_beamwidth = (a.effective_beamwidth() + b.effective_beamwidth()) / 2.0;
    if avg_beamwidth <= 0.0 || diff >= avg_beamwidth {
        return 0.0;
    }
    ((avg_beamwidth - diff) / avg_beamwidth).clamp(0.0, 1.0)
}

/// Same eNodeB and physically on the same tower.
pub fn is_colocated(a: &Cell, b: &Cell, radius_m: f64) -> bool {
    a.enodeb == b.enodeb && distance(a, b) < radius_m
}

pub fn analyze_interaction(target: &Cell, neighbor: &Cell, colocation_radius_m: f64) -> SectorInteraction {
    let distance = distance(target, neighbor);
    let azimuth_diff = azimuth_diff(target, neighbor);
    SectorInteraction {
        distance,
        azimuth_diff,
        interference: interference_factor(azimuth_diff),
        overlap: overlap_fraction(target, neighbor),
        is_overlapping: sectors_overlap(target, neighbor),
        is_colocated: is_colocated(target, neighbor, colocation_radius_m),
    }
}
