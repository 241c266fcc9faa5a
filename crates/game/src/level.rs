//! The built-in level and its tile legend.

use engine::Vec2;
use tracing::{info, warn};

use crate::sim::{Legend, LevelError, TileKind, TileWorld};

pub const PLAYER_SPAWN: Vec2 = Vec2::new(240.0, 120.0);
pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 52.0);

/// `#` brick, `@` ground fill, `=` floating ledge, `.` air.
pub const LEGEND_ENTRIES: [(char, TileKind); 4] = [
    ('#', TileKind::solid(2)),
    ('@', TileKind::solid(12)),
    ('=', TileKind::solid(5)),
    ('.', TileKind::EMPTY),
];

pub const LEVEL_ROWS: [&str; 18] = [
    "........................................................................................................................",
    "........................................................................................................................",
    "........................................................................................................................",
    "........................................................................................................................",
    "........................................................................................................................",
    "...................................===..................................................................................",
    ".........................===...........................===..............................................................",
    "............===..................................................====...................................................",
    "..................................................====....................................................===...........",
    ".............................====............................................................===........................",
    "..........===....................................................====...................................................",
    "........................................................................................................................",
    "..........####....................####............................####..................................................",
    "........................................................................................................................",
    "@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@.",
    "@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@.",
    "@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@.",
    "@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@....@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@.",
];

pub fn build_world(tile_size: f32) -> Result<TileWorld, LevelError> {
    let legend = Legend::new(&LEGEND_ENTRIES)?;
    let world = TileWorld::new(&LEVEL_ROWS, legend, tile_size)?;
    let unknown_codes = world.unknown_code_count();
    if unknown_codes > 0 {
        warn!(unknown_codes, "level_has_unknown_tile_codes");
    }
    info!(
        width = world.width(),
        height = world.height(),
        solid_tiles = world.solid_tile_count(),
        "level_built"
    );
    Ok(world)
}
