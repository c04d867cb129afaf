use crate::systems::random::CellRng;

use super::WorldCore;

pub(super) fn set_ambient_temperature(world: &mut WorldCore, temp: f32) {
    if !temp.is_finite() {
        log::warn!("ignoring non-finite ambient temperature");
        return;
    }
    world.config.ambient_temperature = world.config.clamp_temperature(temp);
    // Every cell now sits off ambient; let them all converge.
    world.chunks.activate_all();
}

pub(super) fn set_wind(world: &mut WorldCore, wind_x: f32) {
    if wind_x.is_finite() {
        world.config.wind_x = wind_x.clamp(-1.0, 1.0);
    }
}

pub(super) fn set_chunk_sleeping_enabled(world: &mut WorldCore, enabled: bool) {
    world.config.chunk_sleeping_enabled = enabled;
    world.chunks.set_sleeping_enabled(enabled);
    if enabled {
        // Nothing was tracked while sleeping was off.
        world.chunks.activate_all();
    }
}

pub(super) fn set_inactivity_threshold(world: &mut WorldCore, ticks: u64) {
    world.config.inactivity_threshold = ticks;
    world.chunks.set_inactivity_threshold(ticks);
}

pub(super) fn set_seed(world: &mut WorldCore, seed: u32) {
    world.config.seed = seed;
    world.rng = CellRng::new(seed);
}
