use super::physics::SectorInteraction;
use super::types::ScoreDetails;
use crate::config::ScoringWeights;

/// Small reward for spatial separation between reusing cells.
pub fn distance_bonus(distance_m: f64) -> f64 {
    if distance_m > 5000.0 {
        10.0
    } else if distance_m > 2000.0 {
        5.0
    } else if distance_m > 1000.0 {
        3.0
    } else if distance_m > 500.0 {
        1.0
    } else {
        0.0
    }
}

/// Scores `candidate` against a single neighbor currently holding `neighbor_pci`,
/// accumulating each family into `d`.
pub fn accumulate_pair(
    d: &mut ScoreDetails,
    m: &SectorInteraction,
    candidate: u16,
    neighbor_pci: u16,
    w: &ScoringWeights,
) {
    let same_mod = |n: u16| candidate % n == neighbor_pci % n;
    let k = m.interference;

    if m.is_overlapping {
        let f = m.overlap * w.overlap_amplifier;
        if candidate == neighbor_pci {
            d.overlap_same_pci -= w.penalty_same_pci_overlap * f;
        }
        if same_mod(3) {
            d.overlap_mod3 -= w.penalty_mod3_overlap * f;
        }
        if same_mod(6) {
            d.overlap_mod6 -= w.penalty_mod6_overlap * f;
        }
    } else {
        if same_mod(3) {
            d.azimuth_mod3 -= w.penalty_mod3 * k;
        }
        if same_mod(6) {
            d.azimuth_mod6 -= w.penalty_mod6 * k;
        }
    }

    if same_mod(12) {
        d.mod12 -= w.penalty_mod12 * k;
    }
    if same_mod(30) {
        d.mod30 -= w.penalty_mod30 * k;
    }

    if m.is_colocated {
        if same_mod(3) {
            d.colocated -= w.penalty_colocated_mod3;
        } else {
            d.colocated += w.bonus_colocated_diverse;
        }
    }

    // Separation matters less while the sectors still illuminate each other.
    let damping = 1.0 - m.overlap.max(k * 0.5);
    d.distance += distance_bonus(m.distance) * damping;

    if m.is_back_to_back() {
        d.back_to_back += w.bonus_back_to_back;
    }
    if m.overlap == 0.0 {
        d.no_overlap += w.bonus_no_overlap;
    }

    d.neighbors += 1;
}
