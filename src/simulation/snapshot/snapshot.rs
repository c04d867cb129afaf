use serde::{Deserialize, Serialize};

use crate::domain::material::EMPTY;
use crate::error::{EngineError, EngineResult};

use super::init::{cell_dimensions, reinit};
use super::WorldCore;

/// Full copy of the per-cell state, enough to resume a run bit-for-bit
/// under the same materials, config and seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// World size in world units
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub material_ids: Vec<u8>,
    pub temperatures: Vec<f32>,
    pub scratch: Vec<f32>,
    #[serde(default)]
    pub lifetimes: Vec<u16>,
    #[serde(default)]
    pub tick: u64,
}

pub(super) fn capture(world: &WorldCore) -> Snapshot {
    Snapshot {
        width: world.world_width,
        height: world.world_height,
        cell_size: world.cell_size,
        material_ids: world.grid.ids.clone(),
        temperatures: world.grid.temperature.clone(),
        scratch: world.grid.scratch.clone(),
        lifetimes: world.grid.life.clone(),
        tick: world.tick,
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> EngineResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::SnapshotMismatch { field, expected, actual })
    }
}

/// Validate everything before touching the world; a rejected snapshot leaves it unchanged.
fn validate(world: &WorldCore, snapshot: &Snapshot) -> EngineResult<()> {
    if snapshot.cell_size == 0 {
        return Err(EngineError::InvalidConfig("snapshot cell size is 0".into()));
    }
    let (w, h) = cell_dimensions(snapshot.width, snapshot.height, snapshot.cell_size);
    let cells = w as usize * h as usize;
    check_len("materialIds", cells, snapshot.material_ids.len())?;
    check_len("temperatures", cells, snapshot.temperatures.len())?;
    check_len("scratch", cells, snapshot.scratch.len())?;
    if !snapshot.lifetimes.is_empty() {
        check_len("lifetimes", cells, snapshot.lifetimes.len())?;
    }
    if let Some(&bad) = snapshot.material_ids.iter().find(|&&id| !world.registry.is_valid(id)) {
        return Err(EngineError::InvalidMaterialId(bad));
    }
    Ok(())
}

pub(super) fn restore(world: &mut WorldCore, snapshot: &Snapshot) -> EngineResult<()> {
    validate(world, snapshot)?;
    world.registry.ensure_compiled();
    reinit(world, snapshot.width, snapshot.height, snapshot.cell_size);

    let ambient = world.config.ambient_temperature;
    let grid = &mut world.grid;
    grid.ids.copy_from_slice(&snapshot.material_ids);
    for (dst, &t) in grid.temperature.iter_mut().zip(&snapshot.temperatures) {
        *dst = if t.is_finite() { world.config.clamp_temperature(t) } else { ambient };
    }
    grid.scratch.copy_from_slice(&snapshot.scratch);
    if snapshot.lifetimes.is_empty() {
        for (life, &id) in grid.life.iter_mut().zip(&snapshot.material_ids) {
            *life = world.registry.lifetime(id);
        }
    } else {
        grid.life.copy_from_slice(&snapshot.lifetimes);
    }

    world.tick = snapshot.tick;
    world.chunks.reset(world.tick);
    let (w, h) = (world.grid.width(), world.grid.height());
    for y in 0..h {
        for x in 0..w {
            let idx = world.grid.index(x, y);
            if world.grid.ids[idx] != EMPTY || world.grid.temperature[idx] != ambient {
                world.chunks.wake(x, y);
            }
        }
    }
    log::info!("restored snapshot at tick {} ({}x{} cells)", world.tick, w, h);
    Ok(())
}
