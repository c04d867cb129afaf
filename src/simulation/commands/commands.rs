use crate::domain::material::{MaterialId, EMPTY};

use super::WorldCore;

/// World coordinates to the cell containing them, if on-grid.
pub(super) fn cell_at(world: &WorldCore, x: i32, y: i32) -> Option<(u32, u32)> {
    let cs = world.cell_size as i32;
    let cx = x.div_euclid(cs);
    let cy = y.div_euclid(cs);
    if world.grid.in_bounds(cx, cy) {
        Some((cx as u32, cy as u32))
    } else {
        None
    }
}

fn lookup(world: &WorldCore, op: &str, material: &str) -> Option<MaterialId> {
    let id = world.registry.id(material);
    if id.is_none() {
        log::warn!("{op}: unknown material \"{material}\"");
    }
    id
}

/// Write `id` into a cell at its spawn temperature (or `temperature`).
pub(super) fn put_cell(world: &mut WorldCore, cx: u32, cy: u32, id: MaterialId, temperature: Option<f32>) {
    let ambient = world.config.ambient_temperature;
    let t = temperature
        .filter(|t| t.is_finite())
        .unwrap_or_else(|| world.registry.spawn_temperature(id, ambient));
    world.context(0.0).transform(cx, cy, id, t);
}

pub(super) fn set(world: &mut WorldCore, x: i32, y: i32, material: &str, temperature: Option<f32>) -> bool {
    let Some(id) = lookup(world, "set", material) else {
        return false;
    };
    let Some((cx, cy)) = cell_at(world, x, y) else {
        return false;
    };
    put_cell(world, cx, cy, id, temperature);
    true
}

pub(super) fn get(world: &WorldCore, x: i32, y: i32) -> Option<&str> {
    let (cx, cy) = cell_at(world, x, y)?;
    let id = world.grid.ids[world.grid.index(cx, cy)];
    if id == EMPTY {
        return None;
    }
    world.registry.name(id)
}

/// Move a cell's contents elsewhere, keeping its remaining lifetime.
pub(super) fn place_cell(world: &mut WorldCore, cx: u32, cy: u32, id: MaterialId, temperature: f32, life: u16) {
    world.context(0.0).place(cx, cy, id, temperature, life);
}

pub(super) fn clear_cell(world: &mut WorldCore, cx: u32, cy: u32) {
    if world.grid.is_empty_idx(world.grid.index(cx, cy)) {
        return;
    }
    world.context(0.0).clear(cx, cy);
}

/// Set a cell's temperature and wake around it.
pub(super) fn heat_cell(world: &mut WorldCore, cx: u32, cy: u32, temperature: f32) {
    let mut ctx = world.context(0.0);
    ctx.set_temperature(cx, cy, temperature);
    ctx.chunks.wake(cx, cy);
}

pub(super) fn clear(world: &mut WorldCore, x: i32, y: i32) {
    if let Some((cx, cy)) = cell_at(world, x, y) {
        clear_cell(world, cx, cy);
    }
}

pub(super) fn set_temperature(world: &mut WorldCore, x: i32, y: i32, temperature: f32) -> bool {
    if !temperature.is_finite() {
        return false;
    }
    let Some((cx, cy)) = cell_at(world, x, y) else {
        return false;
    };
    world.context(0.0).set_temperature(cx, cy, temperature);
    true
}

/// Cell-space span of world coordinates `a..=b`, clamped to `0..len`.
fn clamped_span(a: i32, b: i32, cell_size: i32, len: u32) -> Option<(u32, u32)> {
    let lo = a.min(b).div_euclid(cell_size);
    let hi = a.max(b).div_euclid(cell_size);
    if hi < 0 || lo >= len as i32 {
        return None;
    }
    Some((lo.max(0) as u32, hi.min(len as i32 - 1) as u32))
}

pub(super) fn fill(world: &mut WorldCore, x1: i32, y1: i32, x2: i32, y2: i32, material: &str) -> u32 {
    let Some(id) = lookup(world, "fill", material) else {
        return 0;
    };
    let cs = world.cell_size as i32;
    let Some((cx0, cx1)) = clamped_span(x1, x2, cs, world.grid.width()) else {
        return 0;
    };
    let Some((cy0, cy1)) = clamped_span(y1, y2, cs, world.grid.height()) else {
        return 0;
    };
    let mut written = 0;
    for cy in cy0..=cy1 {
        for cx in cx0..=cx1 {
            put_cell(world, cx, cy, id, None);
            written += 1;
        }
    }
    written
}

/// On-grid cells within `r` cells of `(ccx, ccy)`, row by row, with their
/// distance from the center. The scan is bounded by the grid, not the radius.
pub(super) fn disc_cells(world: &WorldCore, ccx: i32, ccy: i32, r: f32) -> Vec<(u32, u32, f32)> {
    let mut cells = Vec::new();
    if r.is_nan() || r < 0.0 {
        return cells;
    }
    let reach = r.ceil() as i64;
    let (cx, cy) = (ccx as i64, ccy as i64);
    let x0 = cx.saturating_sub(reach).max(0);
    let x1 = cx.saturating_add(reach).min(world.grid.width() as i64 - 1);
    let y0 = cy.saturating_sub(reach).max(0);
    let y1 = cy.saturating_add(reach).min(world.grid.height() as i64 - 1);
    let r2 = (r as f64) * (r as f64);
    for y in y0..=y1 {
        let dy = (y - cy) as f64;
        for x in x0..=x1 {
            let dx = (x - cx) as f64;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 {
                continue;
            }
            cells.push((x as u32, y as u32, d2.sqrt() as f32));
        }
    }
    cells
}

pub(super) fn circle(world: &mut WorldCore, x: i32, y: i32, radius: f32, material: &str) -> u32 {
    let Some(id) = lookup(world, "circle", material) else {
        return 0;
    };
    if !radius.is_finite() || radius < 0.0 {
        return 0;
    }
    let cs = world.cell_size as i32;
    let r = radius / world.cell_size as f32;
    let cells = disc_cells(world, x.div_euclid(cs), y.div_euclid(cs), r);
    for &(cx, cy, _) in &cells {
        put_cell(world, cx, cy, id, None);
    }
    cells.len() as u32
}

pub(super) fn reset(world: &mut WorldCore) {
    world.grid.clear(world.config.ambient_temperature);
    world.chunks.reset(0);
    world.tick = 0;
}
