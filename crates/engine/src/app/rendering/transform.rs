use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2 {
            x: self.width as f32,
            y: self.height as f32,
        }
    }
}

/// Camera position is the world coordinate shown at the top-left screen pixel.
pub fn world_to_screen_px(world: Vec2, camera: Vec2) -> (i32, i32) {
    (
        (world.x - camera.x).floor() as i32,
        (world.y - camera.y).floor() as i32,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

/// Inclusive tile range overlapping the viewport, clamped to the map.
pub fn visible_tile_rect(
    camera: Vec2,
    viewport: Viewport,
    tile_size: f32,
    map_width: u32,
    map_height: u32,
) -> Option<TileRect> {
    if map_width == 0 || map_height == 0 || !(tile_size > 0.0) {
        return None;
    }

    let raw_x_min = (camera.x / tile_size).floor() as i64;
    let raw_x_max = ((camera.x + viewport.width as f32) / tile_size).ceil() as i64 - 1;
    let raw_y_min = (camera.y / tile_size).floor() as i64;
    let raw_y_max = ((camera.y + viewport.height as f32) / tile_size).ceil() as i64 - 1;

    let x_min = raw_x_min.max(0);
    let x_max = raw_x_max.min(map_width as i64 - 1);
    let y_min = raw_y_min.max(0);
    let y_max = raw_y_max.min(map_height as i64 - 1);

    if x_min > x_max || y_min > y_max {
        return None;
    }

    Some(TileRect {
        x_min: x_min as u32,
        x_max: x_max as u32,
        y_min: y_min as u32,
        y_max: y_max as u32,
    })
}
