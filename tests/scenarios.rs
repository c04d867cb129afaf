use sandfall_engine::{
    CellExtension, ExtensionContext, Material, MaterialProps, MaterialState, SimConfig, WorldCore,
};

const DT: f32 = 1.0 / 60.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sand_column_settles_on_the_floor() {
    init_logging();
    let mut world = WorldCore::new(32, 32, 1);
    world.fill(16, 0, 16, 9, "sand");

    for _ in 0..200 {
        world.update(DT);
    }

    assert_eq!(world.particle_count(), 10);
    assert!(world.get(16, 31).is_some());
    for y in 0..20 {
        for x in 0..32 {
            assert_eq!(world.get(x, y), None, "sand left floating at ({x}, {y})");
        }
    }
}

#[test]
fn wood_catches_fire_from_lava() {
    init_logging();
    let mut world = WorldCore::new(32, 32, 1);
    world.fill(0, 31, 31, 31, "stone");
    world.fill(10, 28, 20, 30, "wood");
    world.fill(21, 28, 23, 30, "stone");
    world.set(15, 27, "lava");

    let mut burned = false;
    for _ in 0..600 {
        world.update(DT);
        let any_fire = (0..32).any(|y| (0..32).any(|x| world.get(x, y) == Some("fire")));
        if any_fire {
            burned = true;
            break;
        }
    }
    assert!(burned);
}

#[test]
fn custom_material_behaves_by_state() {
    init_logging();
    let mut world = WorldCore::with_config(16, 16, 1, SimConfig::default()).expect("valid config");
    let mut props = MaterialProps::new(MaterialState::Gas, -0.5);
    props.colors = vec![0xFF00_FF00];
    world.material("marsh gas", props).expect("registered");

    world.set(8, 15, "marsh gas");
    for _ in 0..40 {
        world.update(DT);
    }

    let top_half = (0..8).any(|y| (0..16).any(|x| world.get(x, y) == Some("marsh gas")));
    assert!(top_half);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        min_temperature: 100.0,
        max_temperature: -100.0,
        ..SimConfig::default()
    };
    assert!(WorldCore::with_config(16, 16, 1, config).is_err());
}

/// Turns every claimed cell's scratch value into an age counter.
struct Ager;

impl CellExtension for Ager {
    fn name(&self) -> &str {
        "ager"
    }

    fn applies_to(&self, material: &Material) -> bool {
        material.name == "stone"
    }

    fn update(&mut self, ctx: &mut ExtensionContext<'_, '_>, x: u32, y: u32) {
        let (x, y) = (x as i32, y as i32);
        let age = ctx.scratch(x, y).unwrap_or(0.0);
        ctx.set_scratch(x, y, age + 1.0);
    }
}

#[test]
fn extensions_keep_state_in_scratch() {
    init_logging();
    let mut world = WorldCore::new(16, 16, 1);
    world.register_extension(Box::new(Ager));
    world.set(4, 4, "stone");

    for _ in 0..5 {
        world.update(DT);
    }

    let snapshot = world.snapshot();
    let idx = 4 * 16 + 4;
    assert_eq!(snapshot.scratch[idx], 5.0);
}
