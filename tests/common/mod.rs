#![allow(dead_code)]

use pciforge::geometry::{Cell, TowerType};
use pciforge::oracle::{Conflict, ConflictOracle, ConflictType, OracleError, Severity};
use pciforge::scorer::physics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// ~111 m per 0.001° of latitude near the equator.
pub const DEG_PER_100M: f64 = 0.0009;

/// Builder for test cells. Defaults to a lone 3-sector site at the origin.
pub struct CellBuilder {
    cell: Cell,
}

impl CellBuilder {
    pub fn new(id: &str, pci: u16) -> Self {
        Self {
            cell: Cell::builder()
                .id(id)
                .enodeb(1000)
                .pci(pci)
                .latitude(0.0)
                .longitude(0.0)
                .build(),
        }
    }

    pub fn enodeb(mut self, enodeb: u32) -> Self {
        self.cell.enodeb = enodeb;
        self
    }

    pub fn sector(mut self, sector: u32) -> Self {
        self.cell.sector = sector;
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.cell.latitude = latitude;
        self.cell.longitude = longitude;
        self
    }

    pub fn azimuth(mut self, azimuth: f64) -> Self {
        self.cell.azimuth = Some(azimuth);
        self
    }

    pub fn beamwidth(mut self, beamwidth: f64) -> Self {
        self.cell.beamwidth = Some(beamwidth);
        self
    }

    pub fn rs_power(mut self, rs_power: f64) -> Self {
        self.cell.rs_power = rs_power;
        self
    }

    pub fn tower(mut self, tower: TowerType) -> Self {
        self.cell.tower_type = Some(tower);
        self
    }

    pub fn build(self) -> Cell {
        self.cell
    }
}

pub fn conflict(a: &Cell, b: &Cell, severity: Severity, kind: ConflictType) -> Conflict {
    Conflict {
        id: format!("{}-{}-{}", a.id, b.id, kind),
        conflict_type: kind,
        severity,
        primary_cell: a.clone(),
        conflicting_cell: b.clone(),
        distance: physics::distance(a, b),
    }
}

/// `n` cells on separate eNodeBs, 300 m apart along the equator, all facing north.
pub fn cluster(n: usize, pci: impl Fn(usize) -> u16) -> Vec<Cell> {
    (0..n)
        .map(|i| {
            CellBuilder::new(&format!("c{}", i), pci(i))
                .enodeb(100 + i as u32)
                .at(0.0, i as f64 * 3.0 * DEG_PER_100M)
                .azimuth(0.0)
                .build()
        })
        .collect()
}

/// One site with sectors at the given azimuths, all holding the same PCI.
pub fn single_site(pci: u16, azimuths: &[f64]) -> Vec<Cell> {
    azimuths
        .iter()
        .enumerate()
        .map(|(i, &az)| {
            CellBuilder::new(&format!("s{}", i + 1), pci)
                .enodeb(7)
                .sector(i as u32 + 1)
                .azimuth(az)
                .build()
        })
        .collect()
}

/// Reports the same conflicts on every call, regardless of the cells.
pub struct ConstantOracle {
    conflicts: Vec<Conflict>,
    calls: AtomicUsize,
}

impl ConstantOracle {
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self {
            conflicts,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConflictOracle for ConstantOracle {
    async fn detect_conflicts(&self, _cells: &[Cell], _check_los: bool) -> Result<Vec<Conflict>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.conflicts.clone())
    }
}

/// Replays a fixed sequence of answers. The last answer repeats once the script runs out.
pub struct ScriptedOracle {
    script: Vec<Vec<Conflict>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(script: Vec<Vec<Conflict>>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConflictOracle for ScriptedOracle {
    async fn detect_conflicts(&self, _cells: &[Cell], _check_los: bool) -> Result<Vec<Conflict>, OracleError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.script.len().saturating_sub(1));
        Ok(self.script.get(idx).cloned().unwrap_or_default())
    }
}

/// Succeeds `ok_calls` times with a constant answer, then fails.
pub struct FailingOracle {
    ok_calls: usize,
    conflicts: Vec<Conflict>,
    calls: AtomicUsize,
}

impl FailingOracle {
    pub fn new(ok_calls: usize, conflicts: Vec<Conflict>) -> Self {
        Self {
            ok_calls,
            conflicts,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ConflictOracle for FailingOracle {
    async fn detect_conflicts(&self, _cells: &[Cell], _check_los: bool) -> Result<Vec<Conflict>, OracleError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n >= self.ok_calls {
            return Err(OracleError::Unavailable("terrain service timed out".to_string()));
        }
        Ok(self.conflicts.clone())
    }
}

/// Flags every pair within `radius_m` sharing a mod-3 class as a critical MOD3
/// conflict. Reads the live PCIs, so it reacts to the optimizer's changes.
pub struct Mod3Oracle {
    pub radius_m: f64,
    calls: AtomicUsize,
    seen: Mutex<Vec<usize>>,
}

impl Mod3Oracle {
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Conflict count reported on each call, in order.
    pub fn reported(&self) -> Vec<usize> {
        self.seen.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ConflictOracle for Mod3Oracle {
    async fn detect_conflicts(&self, cells: &[Cell], _check_los: bool) -> Result<Vec<Conflict>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = Vec::new();
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                if a.pci % 3 == b.pci % 3 && physics::distance(a, b) <= self.radius_m {
                    out.push(conflict(a, b, Severity::Critical, ConflictType::Mod3));
                }
            }
        }
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(out.len());
        }
        Ok(out)
    }
}

pub fn mod3_classes(cells: &[Cell]) -> Vec<u16> {
    cells.iter().map(|c| c.pci % 3).collect()
}
