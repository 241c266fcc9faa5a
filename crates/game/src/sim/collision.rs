//! Axis-separated movement against the tile grid.
//!
//! Each pass moves the body along one axis, then checks the tiles under its
//! leading edge across the perpendicular span. The far edge of a span is taken
//! at `start + extent - 1` so a box flush against a tile boundary does not
//! count as overlapping the next tile.

use super::body::KinematicBody;
use super::world::TileWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Wall,
    Floor,
    Ceiling,
}

fn span(world: &TileWorld, start: f32, extent: f32) -> (i32, i32) {
    (
        world.tile_index(start),
        world.tile_index(start + extent - 1.0),
    )
}

fn any_solid_in_column(world: &TileWorld, column: i32, rows: (i32, i32)) -> bool {
    (rows.0..=rows.1).any(|row| world.is_solid(column, row))
}

fn any_solid_in_row(world: &TileWorld, row: i32, columns: (i32, i32)) -> bool {
    (columns.0..=columns.1).any(|column| world.is_solid(column, row))
}

pub fn resolve_horizontal(
    body: &mut KinematicBody,
    world: &TileWorld,
    dt: f32,
) -> Option<Contact> {
    let size = body.size();
    let tile = world.tile_size();
    body.position.x += body.velocity.x * dt;

    let (left, right) = span(world, body.position.x, size.x);
    let rows = span(world, body.position.y, size.y);

    if body.velocity.x > 0.0 {
        if any_solid_in_column(world, right, rows) {
            body.position.x = right as f32 * tile - size.x;
            body.velocity.x = 0.0;
            return Some(Contact::Wall);
        }
    } else if body.velocity.x < 0.0 && any_solid_in_column(world, left, rows) {
        body.position.x = (left + 1) as f32 * tile;
        body.velocity.x = 0.0;
        return Some(Contact::Wall);
    }
    None
}

/// Clears `on_ground`, then sets it again only on floor contact.
///
/// Downward and resting bodies also probe the row just below their feet, so a
/// body standing flush on a floor keeps reporting ground contact even when
/// this tick's fall distance did not reach into the floor tile.
pub fn resolve_vertical(
    body: &mut KinematicBody,
    world: &TileWorld,
    dt: f32,
) -> Option<Contact> {
    let size = body.size();
    let tile = world.tile_size();
    body.position.y += body.velocity.y * dt;

    let columns = span(world, body.position.x, size.x);
    let (top, bottom) = span(world, body.position.y, size.y);

    body.on_ground = false;

    if body.velocity.y > 0.0 && any_solid_in_row(world, bottom, columns) {
        land(body, bottom as f32 * tile);
        return Some(Contact::Floor);
    }
    if body.velocity.y < 0.0 {
        if any_solid_in_row(world, top, columns) {
            body.position.y = (top + 1) as f32 * tile;
            body.velocity.y = 0.0;
            return Some(Contact::Ceiling);
        }
        return None;
    }

    let feet_row = world.tile_index(body.position.y + size.y);
    if any_solid_in_row(world, feet_row, columns) {
        land(body, feet_row as f32 * tile);
        return Some(Contact::Floor);
    }
    None
}

fn land(body: &mut KinematicBody, floor_y: f32) {
    body.position.y = floor_y - body.size().y;
    body.velocity.y = 0.0;
    body.on_ground = true;
}

#[cfg(test)]
mod tests {
    use engine::Vec2;

    use super::*;
    use crate::sim::world::{Legend, TileKind};

    const T: f32 = 64.0;

    fn world(rows: &[&str]) -> TileWorld {
        let legend = Legend::new(&[('#', TileKind::solid(2))]).expect("legend");
        TileWorld::new(rows, legend, T).expect("world")
    }

    fn body_at(x: f32, y: f32) -> KinematicBody {
        KinematicBody::new(Vec2::new(x, y), Vec2::new(32.0, 52.0))
    }

    fn overlaps_solid(body: &KinematicBody, world: &TileWorld) -> bool {
        let size = body.size();
        let (left, right) = span(world, body.position.x, size.x);
        let (top, bottom) = span(world, body.position.y, size.y);
        (left..=right).any(|column| (top..=bottom).any(|row| world.is_solid(column, row)))
    }

    #[test]
    fn moving_right_snaps_flush_to_wall() {
        let world = world(&["...#", "...#"]);
        let mut body = body_at(155.0, 10.0);
        body.velocity.x = 300.0;

        let contact = resolve_horizontal(&mut body, &world, 0.033);

        assert_eq!(contact, Some(Contact::Wall));
        assert_eq!(body.position.x, 3.0 * T - 32.0);
        assert_eq!(body.velocity.x, 0.0);
        assert!(!overlaps_solid(&body, &world));
    }

    #[test]
    fn moving_left_snaps_flush_to_wall() {
        let world = world(&["#...", "#..."]);
        let mut body = body_at(70.0, 10.0);
        body.velocity.x = -300.0;

        assert_eq!(resolve_horizontal(&mut body, &world, 0.033), Some(Contact::Wall));
        assert_eq!(body.position.x, T);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn horizontal_sweep_ignores_floor_under_flush_feet() {
        let world = world(&["....", "####"]);
        let mut body = body_at(10.0, T - 52.0);
        body.velocity.x = 300.0;

        assert_eq!(resolve_horizontal(&mut body, &world, 0.016), None);
        assert!((body.position.x - 14.8).abs() < 1e-3);
    }

    #[test]
    fn zero_velocity_skips_horizontal_scan() {
        let world = world(&["##", "##"]);
        let mut body = body_at(10.0, 10.0);
        assert_eq!(resolve_horizontal(&mut body, &world, 0.016), None);
        assert_eq!(body.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let world = world(&["...", "...", "###"]);
        let mut body = body_at(70.0, 2.0 * T - 52.0 - 5.0);
        body.velocity.y = 600.0;

        assert_eq!(resolve_vertical(&mut body, &world, 0.033), Some(Contact::Floor));
        assert_eq!(body.position.y, 2.0 * T - 52.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.on_ground);
    }

    #[test]
    fn rising_body_stops_under_ceiling_without_ground() {
        let world = world(&["###", "...", "..."]);
        let mut body = body_at(70.0, T + 4.0);
        body.velocity.y = -860.0;
        body.on_ground = true;

        assert_eq!(resolve_vertical(&mut body, &world, 0.016), Some(Contact::Ceiling));
        assert_eq!(body.position.y, T);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn resting_body_with_zero_velocity_stays_grounded() {
        let world = world(&["...", "###"]);
        let mut body = body_at(70.0, T - 52.0);

        assert_eq!(resolve_vertical(&mut body, &world, 0.016), Some(Contact::Floor));
        assert!(body.on_ground);
        assert_eq!(body.position.y, T - 52.0);
    }

    #[test]
    fn small_fall_into_flush_floor_keeps_ground() {
        let world = world(&["...", "###"]);
        let mut body = body_at(70.0, T - 52.0);
        body.velocity.y = 35.2;

        assert_eq!(resolve_vertical(&mut body, &world, 0.016), Some(Contact::Floor));
        assert!(body.on_ground);
        assert_eq!(body.position.y, T - 52.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn airborne_body_over_gap_loses_ground() {
        let world = world(&["...", "#.#"]);
        let mut body = body_at(T + 10.0, T - 52.0);
        body.on_ground = true;
        body.velocity.y = 35.2;

        assert_eq!(resolve_vertical(&mut body, &world, 0.016), None);
        assert!(!body.on_ground);
        assert!(body.position.y > T - 52.0);
    }

    #[test]
    fn body_beyond_world_edge_falls_freely() {
        let world = world(&["###"]);
        let mut body = body_at(-100.0, -60.0);
        body.velocity.y = 500.0;

        assert_eq!(resolve_vertical(&mut body, &world, 0.033), None);
        assert!(!body.on_ground);
    }
}
