use sandfall_engine::WorldCore;

const DT: f32 = 1.0 / 60.0;

fn scene(seed: u32) -> WorldCore {
    let mut world = WorldCore::new(96, 64, 1);
    world.set_seed(seed);
    world.fill(0, 60, 95, 63, "stone");
    world.fill(10, 0, 40, 20, "sand");
    world.fill(50, 5, 80, 25, "water");
    world.fill(60, 50, 70, 59, "lava");
    world.set(30, 40, "fire");
    world
}

#[test]
fn same_seed_same_history() {
    let mut a = scene(7);
    let mut b = scene(7);
    for _ in 0..90 {
        a.update(DT);
        b.update(DT);
    }
    assert_eq!(a.snapshot_json().unwrap(), b.snapshot_json().unwrap());
}

#[test]
fn different_seed_different_history() {
    let mut a = scene(7);
    let mut b = scene(8);
    for _ in 0..90 {
        a.update(DT);
        b.update(DT);
    }
    assert_ne!(a.snapshot().material_ids, b.snapshot().material_ids);
}

#[test]
fn json_restore_continues_identically() {
    let mut world = scene(3);
    for _ in 0..30 {
        world.update(DT);
    }
    let json = world.snapshot_json().unwrap();
    for _ in 0..30 {
        world.update(DT);
    }

    let mut copy = WorldCore::new(1, 1, 1);
    copy.set_seed(3);
    copy.restore_json(&json).unwrap();
    for _ in 0..30 {
        copy.update(DT);
    }

    assert_eq!(copy.snapshot(), world.snapshot());
}
