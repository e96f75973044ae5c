use crate::consts::{DEFAULT_AZIMUTH_DEG, DEFAULT_BEAMWIDTH_DEG, PCI_MAX};
use crate::error::{PciForgeError, PfResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TowerType {
    #[serde(rename = "3-sector")]
    #[strum(serialize = "3-sector")]
    ThreeSector,
    #[serde(rename = "4-sector")]
    #[strum(serialize = "4-sector")]
    FourSector,
}

impl TowerType {
    /// Nominal boresight for a 1-based sector number on this tower layout.
    pub fn default_azimuth(&self, sector: u32) -> f64 {
        let idx = sector.saturating_sub(1) as usize;
        match self {
            Self::ThreeSector => [0.0, 120.0, 240.0][idx % 3],
            Self::FourSector => [0.0, 90.0, 180.0, 270.0][idx % 4],
        }
    }
}

fn default_sector() -> u32 {
    1
}

/// One radio sector in a snapshot. Only `pci` is ever mutated by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[builder(setter(into))]
    pub id: String,
    #[serde(rename = "eNodeB")]
    pub enodeb: u32,
    #[builder(default = 1)]
    #[serde(default = "default_sector")]
    pub sector: u32,
    pub pci: u16,
    pub latitude: f64,
    pub longitude: f64,

    /// Boresight in degrees, 0..360. Absent means 0.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub azimuth: Option<f64>,

    /// Horizontal beamwidth in degrees. Absent means 65.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub beamwidth: Option<f64>,

    /// Reference signal power; the weaker cell of a conflict is the one moved.
    #[builder(default)]
    #[serde(default)]
    pub rs_power: f64,

    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub tower_type: Option<TowerType>,
}

impl Cell {
    #[inline(always)]
    pub fn effective_azimuth(&self) -> f64 {
        self.azimuth.unwrap_or(DEFAULT_AZIMUTH_DEG)
    }

    #[inline(always)]
    pub fn effective_beamwidth(&self) -> f64 {
        self.beamwidth.unwrap_or(DEFAULT_BEAMWIDTH_DEG)
    }

    pub fn mod3(&self) -> u16 {
        self.pci % 3
    }
}

/// Fills missing azimuths from the tower layout (3-sector or 4-sector).
/// Cells without a tower type keep the 0° default.
pub fn infer_azimuths(cells: &mut [Cell]) {
    for cell in cells.iter_mut() {
        if cell.azimuth.is_none() {
            if let Some(tower) = cell.tower_type {
                cell.azimuth = Some(tower.default_azimuth(cell.sector));
            }
        }
    }
}

/// Loads a cell snapshot. `.csv` files are read with a header row,
/// everything else is parsed as a JSON array.
pub fn load_cells<P: AsRef<Path>>(path: P) -> PfResult<Vec<Cell>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let cells: Vec<Cell> = if is_csv {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        rdr.deserialize().collect::<Result<Vec<Cell>, csv::Error>>()?
    } else {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    };

    validate_cells(&cells)?;
    Ok(cells)
}

/// Checks the snapshot invariants: PCIs within 0..=503 and unique ids.
pub fn validate_cells(cells: &[Cell]) -> PfResult<()> {
    let mut seen = fnv::FnvHashSet::default();
    for cell in cells {
        if cell.pci > PCI_MAX {
            return Err(PciForgeError::Validation(format!(
                "Cell '{}' has PCI {} (max {})",
                cell.id, cell.pci, PCI_MAX
            )));
        }
        if !seen.insert(cell.id.as_str()) {
            return Err(PciForgeError::Validation(format!(
                "Duplicate cell id '{}'",
                cell.id
            )));
        }
    }
    Ok(())
}
