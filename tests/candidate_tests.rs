use fnv::FnvHashSet;
use pciforge::optimizer::{CandidatePool, PciRange, Selection};
use rstest::rstest;

fn used(values: &[u16]) -> FnvHashSet<u16> {
    values.iter().copied().collect()
}

#[rstest]
#[case(100)]
#[case(30)]
#[case(503)]
#[case(5)]
fn test_bulk_leads_with_other_mod3_classes(#[case] current: u16) {
    let taken = used(&[current, 31, 32, 33]);
    let pool = CandidatePool::new(PciRange::default(), &taken);
    let mut rng = fastrand::Rng::with_seed(42);

    let candidates = pool.generate(current, &mut rng);
    assert_eq!(candidates.len(), 50);
    assert!(candidates.iter().all(|p| p % 3 != current % 3));
    assert!(candidates.iter().all(|p| !taken.contains(p)));
}

#[test]
fn test_mod3_classes_are_capped_evenly() {
    let taken = FnvHashSet::default();
    let pool = CandidatePool::new(PciRange::default(), &taken);
    let mut rng = fastrand::Rng::with_seed(1);

    // 100 % 3 == 1: thirty from class 0, then class 2 fills the rest.
    let candidates = pool.generate(100, &mut rng);
    assert_eq!(&candidates[..3], &[30, 33, 36]);
    assert!(candidates[..30].iter().all(|p| p % 3 == 0));
    assert!(candidates[30..].iter().all(|p| p % 3 == 2));
}

#[test]
fn test_same_class_other_mod6_when_classes_exhausted() {
    // Everything outside current's mod3 class is taken.
    let taken: FnvHashSet<u16> = (30..=503).filter(|p| p % 3 != 0).collect();
    let pool = CandidatePool::new(PciRange::default(), &taken);
    let mut rng = fastrand::Rng::with_seed(7);

    let candidates = pool.select(30, Selection::Bulk(10), &mut rng);
    assert_eq!(candidates.len(), 10);
    assert!(candidates.iter().all(|p| p % 6 == 3));

    let single = pool.pick_diverse_random(30, &mut rng);
    assert_eq!(single % 6, 3);
}

#[test]
fn test_sequential_tier_wraps_but_stays_in_range() {
    let taken: FnvHashSet<u16> = (30..=40).collect();
    let range = PciRange::new(30, 40);
    let pool = CandidatePool::new(range, &taken);
    let mut rng = fastrand::Rng::with_seed(3);

    assert!(pool.generate(35, &mut rng).is_empty());
}

#[test]
fn test_pick_diverse_random_changes_mod3() {
    let taken = used(&[100, 101]);
    let pool = CandidatePool::new(PciRange::default(), &taken);
    for seed in 0..32 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let pci = pool.pick_diverse_random(100, &mut rng);
        assert_ne!(pci % 3, 1);
        assert!((30..=503).contains(&pci));
        assert!(!taken.contains(&pci));
    }
}

#[test]
fn test_pick_diverse_random_full_window_falls_back() {
    let range = PciRange::new(30, 33);
    let taken: FnvHashSet<u16> = range.iter().collect();
    let pool = CandidatePool::new(range, &taken);
    let mut rng = fastrand::Rng::with_seed(0);

    // First value in the window with a different mod3 class.
    assert_eq!(pool.pick_diverse_random(33, &mut rng), 31);
    assert_eq!(pool.pick_diverse_random(31, &mut rng), 30);
}

#[test]
fn test_reserved_input_is_moved_into_range() {
    let taken = FnvHashSet::default();
    let pool = CandidatePool::new(PciRange::default(), &taken);
    let mut rng = fastrand::Rng::with_seed(9);

    assert!(pool.generate(3, &mut rng).iter().all(|&p| p >= 30));
    assert!(pool.pick_diverse_random(3, &mut rng) >= 30);
}
