mod canvas;
mod renderer;
mod transform;

pub use canvas::FrameCanvas;
pub use renderer::{RenderError, Renderer};
pub use transform::{visible_tile_rect, world_to_screen_px, TileRect, Viewport};

use crate::assets::ImageHandle;

use super::Vec2;

/// Grid-addressed tile atlas: visual id `n` lives at column `n % columns`,
/// row `n / columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSheet {
    pub image: ImageHandle,
    pub source_tile_px: u32,
    pub columns: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerRepeat {
    Both,
    /// One row whose bottom edge sits `bottom_offset_px` below the viewport's.
    Horizontal { bottom_offset_px: f32 },
}

/// Background image repeated across the viewport.
///
/// `scroll` is already multiplied by the parallax factor; the layer wraps it
/// by its scaled size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub image: ImageHandle,
    pub scroll: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub repeat: LayerRepeat,
}

/// Everything a scene may draw. Coordinates are screen pixels, origin top-left.
pub trait DrawTarget {
    fn viewport(&self) -> Viewport;
    fn clear(&mut self, color: [u8; 4]);
    fn draw_tile(
        &mut self,
        sheet: &TileSheet,
        visual_id: u16,
        dest_x: i32,
        dest_y: i32,
        size: u32,
    );
    fn draw_sprite(
        &mut self,
        image: ImageHandle,
        dest_x: i32,
        dest_y: i32,
        width: u32,
        height: u32,
    );
    fn draw_layer(&mut self, layer: &ParallaxLayer);
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]);
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 4]);
}
