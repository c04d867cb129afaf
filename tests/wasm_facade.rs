#![cfg(target_arch = "wasm32")]

use sandfall_engine::World;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn facade_round_trips_cells() {
    let mut world = World::new(32, 32, 1);
    assert!(world.set(4, 4, "sand".to_string(), None));
    assert_eq!(world.get(4, 4).as_deref(), Some("sand"));
    assert_eq!(world.material_ids().length(), 32 * 32);
    assert_eq!(world.temperatures().length(), 32 * 32);
}

#[wasm_bindgen_test]
fn facade_reports_errors_as_strings() {
    let mut world = World::new(32, 32, 1);
    let err = world.material("sand".to_string(), "{}".to_string()).unwrap_err();
    assert!(err.as_string().is_some_and(|s| s.contains("sand")));
}

#[wasm_bindgen_test]
fn facade_snapshot_restores() {
    let mut world = World::new(16, 16, 1);
    world.set(2, 2, "water".to_string(), Some(60.0));
    let json = world.snapshot().unwrap();
    world.reset();
    world.restore(json).unwrap();
    assert_eq!(world.get(2, 2).as_deref(), Some("water"));
    assert_eq!(world.temperature_at(2, 2), Some(60.0));
}
