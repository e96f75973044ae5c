mod common;

use common::*;
use pciforge::geometry::{infer_azimuths, validate_cells, Cell, TowerType};
use rstest::rstest;

#[rstest]
#[case(TowerType::ThreeSector, 1, 0.0)]
#[case(TowerType::ThreeSector, 2, 120.0)]
#[case(TowerType::ThreeSector, 3, 240.0)]
#[case(TowerType::ThreeSector, 4, 0.0)]
#[case(TowerType::FourSector, 2, 90.0)]
#[case(TowerType::FourSector, 4, 270.0)]
#[case(TowerType::FourSector, 0, 0.0)]
fn test_tower_default_azimuth(#[case] tower: TowerType, #[case] sector: u32, #[case] expected: f64) {
    assert_eq!(tower.default_azimuth(sector), expected);
}

#[test]
fn test_infer_azimuths_only_fills_gaps() {
    let mut cells = vec![
        CellBuilder::new("a", 100).sector(2).tower(TowerType::ThreeSector).build(),
        CellBuilder::new("b", 101)
            .sector(2)
            .tower(TowerType::FourSector)
            .azimuth(45.0)
            .build(),
        CellBuilder::new("c", 102).sector(3).build(),
    ];
    infer_azimuths(&mut cells);

    assert_eq!(cells[0].azimuth, Some(120.0));
    assert_eq!(cells[1].azimuth, Some(45.0));
    assert_eq!(cells[2].azimuth, None);
    assert_eq!(cells[2].effective_azimuth(), 0.0);
}

#[test]
fn test_cell_json_uses_wire_names() {
    let cell = CellBuilder::new("A1", 42)
        .enodeb(12)
        .rs_power(-85.0)
        .tower(TowerType::FourSector)
        .build();
    let json = serde_json::to_value(&cell).unwrap();

    assert_eq!(json["eNodeB"], 12);
    assert_eq!(json["rsPower"], -85.0);
    assert_eq!(json["towerType"], "4-sector");
    assert!(json["azimuth"].is_null());

    let minimal: Cell = serde_json::from_str(
        r#"{"id":"x","eNodeB":1,"pci":7,"latitude":1.5,"longitude":2.5}"#,
    )
    .unwrap();
    assert_eq!(minimal.sector, 1);
    assert_eq!(minimal.rs_power, 0.0);
    assert_eq!(minimal.beamwidth, None);
    assert_eq!(minimal.mod3(), 1);
}

#[test]
fn test_validate_rejects_bad_snapshots() {
    let ok = cluster(3, |i| i as u16);
    assert!(validate_cells(&ok).is_ok());

    let too_high = cluster(1, |_| 504);
    let err = validate_cells(&too_high).unwrap_err();
    assert!(err.to_string().contains("504"));

    let mut dup = cluster(2, |_| 100);
    dup[1].id = "c0".to_string();
    let err = validate_cells(&dup).unwrap_err();
    assert!(err.to_string().contains("Duplicate cell id 'c0'"));
}
