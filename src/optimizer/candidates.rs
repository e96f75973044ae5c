use crate::consts::{
    BULK_CANDIDATE_LIMIT, MOD3_CLASS_CAP, PCI_MAX, PCI_MIN, RANDOM_SAMPLE_DRAWS,
    SEQUENTIAL_MAX_OFFSET,
};
use fastrand::Rng;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The assignable PCI window. Values below `min` are reserved and are never
/// produced, although inputs may already hold them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciRange {
    pub min: u16,
    pub max: u16,
}

impl Default for PciRange {
    fn default() -> Self {
        Self {
            min: PCI_MIN,
            max: PCI_MAX,
        }
    }
}

impl PciRange {
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn contains(&self, pci: u16) -> bool {
        pci >= self.min && pci <= self.max
    }

    /// Non-empty and inside the assignable PCI space.
    pub fn is_valid(&self) -> bool {
        self.min <= self.max && self.max <= PCI_MAX
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.min..=self.max
    }

    /// Size of the wrapping space for sequential exploration (0..=max).
    #[inline(always)]
    fn space(&self) -> u16 {
        self.max + 1
    }
}

/// How many values a [`CandidatePool`] query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// One value, strict tier priority, random within the first non-empty tier.
    Single,
    /// Up to N deduplicated values, all tiers merged in priority order.
    Bulk(usize),
}

/// Candidate PCI generator for one target cell.
///
/// Tiers, highest priority first:
/// 1. other mod-3 classes
/// 2. same mod-3 class, other mod-6 residue
/// 3. random unused values
/// 4. sequential offsets around the current PCI
pub struct CandidatePool<'a> {
    range: PciRange,
    used: &'a FnvHashSet<u16>,
}

impl<'a> CandidatePool<'a> {
    pub fn new(range: PciRange, used: &'a FnvHashSet<u16>) -> Self {
        Self { range, used }
    }

    /// Ranked candidate list, at most [`BULK_CANDIDATE_LIMIT`] entries.
    pub fn generate(&self, current: u16, rng: &mut Rng) -> Vec<u16> {
        self.select(current, Selection::Bulk(BULK_CANDIDATE_LIMIT), rng)
    }

    /// Single stalemate-breaking value.
    pub fn pick_diverse_random(&self, current: u16, rng: &mut Rng) -> u16 {
        self.select(current, Selection::Single, rng)
            .first()
            .copied()
            .unwrap_or_else(|| self.last_resort(current))
    }

    pub fn select(&self, current: u16, selection: Selection, rng: &mut Rng) -> Vec<u16> {
        match selection {
            Selection::Single => vec![self.single(current, rng)],
            Selection::Bulk(limit) => self.bulk(current, limit, rng),
        }
    }

    fn single(&self, current: u16, rng: &mut Rng) -> u16 {
        let tier = Some(self.mod3_tier(current, None))
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.mod6_tier(current)).filter(|t| !t.is_empty()))
            .or_else(|| Some(self.unused()).filter(|t| !t.is_empty()));

        match tier {
            Some(pool) => pool[rng.usize(..pool.len())],
            None => self
                .range
                .iter()
                .find(|p| p % 3 != current % 3)
                .unwrap_or_else(|| self.last_resort(current)),
        }
    }

    fn bulk(&self, current: u16, limit: usize, rng: &mut Rng) -> Vec<u16> {
        let mut out = Vec::with_capacity(limit);
        let mut seen = FnvHashSet::default();
        let mut push = |pci: u16, out: &mut Vec<u16>| {
            if out.len() < limit && seen.insert(pci) {
                out.push(pci);
            }
        };

        for pci in self.mod3_tier(current, Some(MOD3_CLASS_CAP)) {
            push(pci, &mut out);
        }
        for pci in self.mod6_tier(current) {
            push(pci, &mut out);
        }
        if out.len() >= limit {
            return out;
        }

        let pool = self.unused();
        for _ in 0..RANDOM_SAMPLE_DRAWS.min(pool.len()) {
            push(pool[rng.usize(..pool.len())], &mut out);
        }

        let space = self.range.space();
        let current = current % space;
        for offset in 1..=SEQUENTIAL_MAX_OFFSET.min(space) {
            if out.len() >= limit {
                break;
            }
            let up = (current + offset) % space;
            let down = (current + space - offset) % space;
            for pci in [up, down] {
                if self.range.contains(pci) && !self.used.contains(&pci) {
                    push(pci, &mut out);
                }
            }
        }

        out
    }

    /// Unused PCIs in the two mod-3 classes the current PCI is not in.
    fn mod3_tier(&self, current: u16, per_class_cap: Option<usize>) -> Vec<u16> {
        let current_mod3 = current % 3;
        let cap = per_class_cap.unwrap_or(usize::MAX);
        let mut out = Vec::new();

        for class in (0..3).filter(|&c| c != current_mod3) {
            let first = self.range.min + (3 + class - self.range.min % 3) % 3;
            (first..=self.range.max)
                .step_by(3)
                .filter(|p| !self.used.contains(p))
                .take(cap)
                .for_each(|p| out.push(p));
        }
        out
    }

    /// Unused PCIs sharing the current mod-3 class but not its mod-6 residue.
    fn mod6_tier(&self, current: u16) -> Vec<u16> {
        self.range
            .iter()
            .filter(|p| p % 3 == current % 3 && p % 6 != current % 6)
            .filter(|p| !self.used.contains(p))
            .collect()
    }

    fn unused(&self) -> Vec<u16> {
        self.range
            .iter()
            .filter(|p| !self.used.contains(p))
            .collect()
    }

    fn last_resort(&self, current: u16) -> u16 {
        self.range.min.max((current + 3) % self.range.space())
    }
}
