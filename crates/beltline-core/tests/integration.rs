//! Integration tests for the Beltline factory engine.
//!
//! These tests drive the engine through its public phases and full steps:
//! assignment, processing, return, eviction, and determinism.

use beltline_core::catalog::Catalog;
use beltline_core::config::FactoryConfig;
use beltline_core::engine::Factory;
use beltline_core::id::{ProductId, WorkerId};
use beltline_core::item::Item;
use beltline_core::test_utils::*;
use beltline_core::worker::WorkerState;

// ===========================================================================
// Test 1: Pick up, process, return
// ===========================================================================
//
// Belt of 5, one product, 2 workers per position, 3 ticks of processing.

#[test]
fn assign_process_return_scenario() {
    let mut factory = make_factory(5, &["a"], 2, 3, 2024);
    let a = factory.catalog().product_id("a").unwrap();

    factory.set_belt(&[Item::Raw(a); 5]).unwrap();
    factory.assign_and_return().unwrap();

    assert_eq!(factory.belt().to_vec(), vec![Item::Empty; 5]);
    let mut busy = Vec::new();
    for (position, station) in factory.stations().iter().enumerate() {
        let working: Vec<usize> = station
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_available())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(working.len(), 1, "position {position}");
        let worker = &station[working[0]];
        assert_eq!(worker.remaining_ticks(), 3);
        busy.push(WorkerId::new(position, working[0]));
    }

    for _ in 0..3 {
        factory.advance_workers();
    }
    for &id in &busy {
        assert_eq!(factory.worker(id).unwrap().state(), WorkerState::Done { item: a });
    }

    factory.set_belt(&[Item::Empty; 5]).unwrap();
    let outcome = factory.assign_and_return().unwrap();

    assert_eq!(factory.belt().to_vec(), vec![Item::Completed(a); 5]);
    assert_eq!(outcome.returned, busy);
    for &id in &busy {
        assert!(factory.worker(id).unwrap().is_available());
    }
}

// ===========================================================================
// Test 2: Only one worker per position reacts per tick
// ===========================================================================

#[test]
fn only_one_worker_picks_up_per_position() {
    let mut factory = make_factory(5, &["a"], 2, 3, 1);
    let a = ProductId(0);

    factory.set_belt(&[Item::Raw(a); 5]).unwrap();
    factory.assign_and_return().unwrap();

    for station in factory.stations() {
        assert!(station.iter().any(|w| w.is_available()));
    }
}

#[test]
fn only_one_worker_returns_per_position() {
    let mut factory = make_factory(5, &["a"], 2, 3, 1);
    let a = ProductId(0);

    factory.set_belt(&[Item::Raw(a); 5]).unwrap();
    factory.assign_and_return().unwrap();
    factory.set_belt(&[Item::Raw(a); 5]).unwrap();
    factory.assign_and_return().unwrap();
    for _ in 0..4 {
        factory.advance_workers();
    }

    factory.set_belt(&[Item::Empty; 5]).unwrap();
    factory.assign_and_return().unwrap();

    for station in factory.stations() {
        assert_eq!(station.iter().filter(|w| w.is_available()).count(), 1);
    }
}

#[test]
fn raw_item_at_entry_is_claimed_by_idle_worker() {
    let mut factory = make_factory(5, &["a"], 2, 3, 9);
    let a = ProductId(0);

    for _ in 0..4 {
        factory.advance_workers();
    }
    factory
        .set_belt(&[Item::Empty, Item::Empty, Item::Empty, Item::Empty, Item::Raw(a)])
        .unwrap();
    factory.assign_and_return().unwrap();

    assert_eq!(factory.belt().get(4), Some(Item::Empty));
}

// ===========================================================================
// Test 3: Lossy admission
// ===========================================================================
//
// A single slow worker per position cannot keep up with a belt that always
// carries a product, so unclaimed raw items fall off the end.

#[test]
fn unclaimed_items_fall_off_the_belt() {
    let catalog = Catalog::from_names(&["a"]).unwrap();
    // Script always draws index 0 (the product, never empty).
    let rng = ScriptedChooser::new(vec![0]);
    let mut factory = Factory::new(2, catalog, make_stations(2, 1, 50), rng).unwrap();

    factory.run(10).unwrap();

    let lost = factory.results().iter().filter(|i| i.is_raw()).count();
    assert!(lost > 0, "expected raw items in the results log");
    assert_eq!(factory.results().len(), 10);
}

// ===========================================================================
// Test 4: Finished items ride out of the factory
// ===========================================================================

#[test]
fn completed_items_eventually_exit() {
    let mut factory = FactoryConfig {
        belt_length: 3,
        products: vec!["a".into(), "b".into()],
        seed: Some(5),
        ..FactoryConfig::default()
    }
    .build()
    .unwrap();

    factory.run(500).unwrap();

    let completed = factory.results().iter().filter(|i| i.is_completed()).count();
    assert!(completed > 0, "expected completed records after 500 ticks");
}

#[test]
fn each_step_report_matches_log() {
    let mut factory = make_factory(4, &["a", "b"], 2, 2, 77);
    let run = factory.run(30).unwrap();

    assert_eq!(run.steps_run, 30);
    let evicted: Vec<Item> = run.reports.iter().map(|r| r.evicted).collect();
    assert_eq!(evicted, factory.results());
}

// ===========================================================================
// Test 5: Determinism
// ===========================================================================

#[test]
fn same_config_same_run() {
    let config = FactoryConfig {
        seed: Some(123),
        ..FactoryConfig::default()
    };
    let mut a = config.build().unwrap();
    let mut b = config.build().unwrap();
    a.run(200).unwrap();
    b.run(200).unwrap();

    assert_eq!(a.results(), b.results());
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn different_seeds_diverge() {
    let mut a = make_factory(3, &["a", "b"], 2, 3, 1);
    let mut b = make_factory(3, &["a", "b"], 2, 3, 2);
    a.run(200).unwrap();
    b.run(200).unwrap();

    assert_ne!(a.results(), b.results());
}
