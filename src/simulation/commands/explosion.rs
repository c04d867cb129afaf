//! Explosions
//!
//! Every occupied cell within the radius is lifted out as debris and thrown
//! away from the center, nearest cells first. Debris lands on the last empty
//! cell along its path; debris with nowhere to go is destroyed. All cells in
//! the radius are heated, and the core is left burning.
//!
//! Writes go through the same cell commands as `set` and `clear`.

use crate::domain::material::{MaterialId, EMPTY};
use crate::systems::random::SALT_EXPLOSION;

use super::commands::{clear_cell, disc_cells, heat_cell, place_cell, put_cell};
use super::WorldCore;

struct Debris {
    dist: f32,
    x: u32,
    y: u32,
    id: MaterialId,
    temperature: f32,
    life: u16,
}

pub(super) fn explode(world: &mut WorldCore, x: i32, y: i32, radius: f32, power: f32) {
    if !radius.is_finite() || radius <= 0.0 || !power.is_finite() {
        log::warn!("explode: ignoring radius {radius} power {power}");
        return;
    }
    let cs = world.cell_size as i32;
    let (ccx, ccy) = (x.div_euclid(cs), y.div_euclid(cs));
    let r = radius / world.cell_size as f32;
    let heat = world.config.explosion_heat;

    let mut debris = Vec::new();
    for (tx, ty, dist) in disc_cells(world, ccx, ccy, r) {
        let idx = world.grid.index(tx, ty);
        let t = world.grid.temperature[idx] + heat * (0.5 + 0.5 * (1.0 - dist / r));
        let id = world.grid.ids[idx];
        if id != EMPTY {
            debris.push(Debris { dist, x: tx, y: ty, id, temperature: t, life: world.grid.life[idx] });
            clear_cell(world, tx, ty);
        }
        heat_cell(world, tx, ty, t);
    }

    debris.sort_by(|a, b| a.dist.total_cmp(&b.dist));
    let mut landed = 0u32;
    for piece in &debris {
        if throw(world, piece, ccx, ccy, r, power) {
            landed += 1;
        }
    }

    let fire_radius = r * world.config.explosion_fire_fraction;
    let mut burning = 0u32;
    if let Some(fire) = world.registry.id("fire") {
        let fire_temp = world.registry.declared_temperature(fire);
        for (tx, ty, _) in disc_cells(world, ccx, ccy, fire_radius) {
            let current = world.grid.temperature[world.grid.index(tx, ty)];
            let t = fire_temp.map_or(current, |f| f.max(current));
            put_cell(world, tx, ty, fire, Some(t));
            burning += 1;
        }
    }

    log::debug!(
        "explosion at ({ccx}, {ccy}) r={r}: {} debris, {landed} landed, {burning} burning",
        debris.len()
    );
}

/// Fly one piece of debris outward. Returns false when it was destroyed.
fn throw(world: &mut WorldCore, piece: &Debris, ccx: i32, ccy: i32, r: f32, power: f32) -> bool {
    let (dx, dy) = (piece.x as i64 - ccx as i64, piece.y as i64 - ccy as i64);
    let (dir_x, dir_y) = if dx == 0 && dy == 0 {
        let idx = world.grid.index(piece.x, piece.y);
        let angle = world.rng.unit(world.tick, idx, SALT_EXPLOSION) * std::f32::consts::TAU;
        (angle.cos(), angle.sin())
    } else {
        let len = piece.dist.max(f32::EPSILON);
        (dx as f32 / len, dy as f32 / len)
    };
    let magnitude = (power * (1.0 - piece.dist / r)).max(0.0);
    let max_x = world.grid.width() as i32 - 1;
    let max_y = world.grid.height() as i32 - 1;
    // Past this the clamped path cannot change.
    let steps = (magnitude.round() as i32).min(2 * (max_x + max_y) + 2);
    let mut landing = None;
    let mut last = (piece.x as i32, piece.y as i32);
    for step in 1..=steps {
        let px = (piece.x as f32 + dir_x * step as f32).round() as i32;
        let py = (piece.y as f32 + dir_y * step as f32).round() as i32;
        let pos = (px.clamp(0, max_x), py.clamp(0, max_y));
        if pos == last {
            continue;
        }
        last = pos;
        let idx = world.grid.index(pos.0 as u32, pos.1 as u32);
        if !world.grid.is_empty_idx(idx) {
            break;
        }
        landing = Some((pos.0 as u32, pos.1 as u32));
    }

    let origin_idx = world.grid.index(piece.x, piece.y);
    let (tx, ty) = match landing {
        Some(pos) => pos,
        None if world.grid.is_empty_idx(origin_idx) => (piece.x, piece.y),
        None => return false,
    };
    place_cell(world, tx, ty, piece.id, piece.temperature, piece.life);
    true
}
