use crate::app::tools::draw_text_clipped;
use crate::assets::{ImageHandle, ImageStore, LoadedImage};

use super::{DrawTarget, LayerRepeat, ParallaxLayer, TileSheet, Viewport};

/// Software draw target over an RGBA8 frame.
pub struct FrameCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    images: &'a ImageStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<'a> FrameCanvas<'a> {
    /// Returns `None` when the frame does not match `width * height` pixels.
    pub fn new(
        frame: &'a mut [u8],
        width: u32,
        height: u32,
        images: &'a ImageStore,
    ) -> Option<Self> {
        if frame.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            frame,
            width,
            height,
            images,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn blit(
        &mut self,
        image: &LoadedImage,
        source: SourceRect,
        dest_x: i32,
        dest_y: i32,
        dest_width: u32,
        dest_height: u32,
        alpha: f32,
    ) {
        if source.width == 0 || source.height == 0 || dest_width == 0 || dest_height == 0 {
            return;
        }
        if source.x + source.width > image.width || source.y + source.height > image.height {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let right = dest_x.saturating_add(dest_width as i32);
        let bottom = dest_y.saturating_add(dest_height as i32);
        let draw_left = dest_x.max(0);
        let draw_top = dest_y.max(0);
        let draw_right = right.min(self.width as i32);
        let draw_bottom = bottom.min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        let x_ratio = source.width as f32 / dest_width as f32;
        let y_ratio = source.height as f32 / dest_height as f32;
        let frame_width = self.width as usize;

        for out_y in draw_top..draw_bottom {
            let dy = (out_y - dest_y) as f32;
            let src_y = ((dy * y_ratio) as u32).min(source.height - 1) + source.y;
            for out_x in draw_left..draw_right {
                let dx = (out_x - dest_x) as f32;
                let src_x = ((dx * x_ratio) as u32).min(source.width - 1) + source.x;
                let texel = image.pixel(src_x, src_y);
                if texel[3] == 0 {
                    continue;
                }
                let offset = (out_y as usize * frame_width + out_x as usize) * 4;
                blend_into(&mut self.frame[offset..offset + 4], texel, alpha);
            }
        }
    }
}

fn blend_into(dst: &mut [u8], src: [u8; 4], alpha: f32) {
    let coverage = (src[3] as f32 / 255.0) * alpha;
    if coverage >= 1.0 {
        dst.copy_from_slice(&src);
        return;
    }
    for channel in 0..3 {
        let blended = src[channel] as f32 * coverage + dst[channel] as f32 * (1.0 - coverage);
        dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = 255;
}

impl DrawTarget for FrameCanvas<'_> {
    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn draw_tile(
        &mut self,
        sheet: &TileSheet,
        visual_id: u16,
        dest_x: i32,
        dest_y: i32,
        size: u32,
    ) {
        let images = self.images;
        let Some(image) = images.get(sheet.image) else {
            return;
        };
        if sheet.columns == 0 {
            return;
        }
        let column = visual_id as u32 % sheet.columns;
        let row = visual_id as u32 / sheet.columns;
        let source = SourceRect {
            x: column * sheet.source_tile_px,
            y: row * sheet.source_tile_px,
            width: sheet.source_tile_px,
            height: sheet.source_tile_px,
        };
        self.blit(image, source, dest_x, dest_y, size, size, 1.0);
    }

    fn draw_sprite(
        &mut self,
        image: ImageHandle,
        dest_x: i32,
        dest_y: i32,
        width: u32,
        height: u32,
    ) {
        let images = self.images;
        let Some(image) = images.get(image) else {
            return;
        };
        let source = full_rect(image);
        self.blit(image, source, dest_x, dest_y, width, height, 1.0);
    }

    fn draw_layer(&mut self, layer: &ParallaxLayer) {
        let images = self.images;
        let Some(image) = images.get(layer.image) else {
            return;
        };
        if !(layer.scale.is_finite() && layer.scale > 0.0) {
            return;
        }
        let tile_w = image.width as f32 * layer.scale;
        let tile_h = image.height as f32 * layer.scale;
        if tile_w < 1.0 || tile_h < 1.0 {
            return;
        }
        let dest_w = tile_w.round() as u32;
        let dest_h = tile_h.round() as u32;
        let view_w = self.width as f32;
        let view_h = self.height as f32;
        let source = full_rect(image);

        let start_x = -(layer.scroll.x % tile_w) - tile_w;
        let rows: Vec<f32> = match layer.repeat {
            LayerRepeat::Horizontal { bottom_offset_px } => {
                vec![view_h - tile_h + bottom_offset_px]
            }
            LayerRepeat::Both => {
                let start_y = -(layer.scroll.y % tile_h) - tile_h;
                std::iter::successors(Some(start_y), |y| Some(y + tile_h))
                    .take_while(|y| *y < view_h + tile_h)
                    .collect()
            }
        };

        for y in rows {
            let mut x = start_x;
            while x < view_w + tile_w {
                self.blit(
                    image,
                    source,
                    x.floor() as i32,
                    y.floor() as i32,
                    dest_w,
                    dest_h,
                    layer.alpha,
                );
                x += tile_w;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(width as i32).min(self.width as i32);
        let end_y = y.saturating_add(height as i32).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }
        let frame_width = self.width as usize;
        for py in start_y..end_y {
            for px in start_x..end_x {
                let offset = (py as usize * frame_width + px as usize) * 4;
                blend_into(&mut self.frame[offset..offset + 4], color, 1.0);
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 4]) {
        draw_text_clipped(self.frame, self.width, self.height, x, y, text, color);
    }
}

fn full_rect(image: &LoadedImage) -> SourceRect {
    SourceRect {
        x: 0,
        y: 0,
        width: image.width,
        height: image.height,
    }
}
