use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use winit::window::Window;

use crate::assets::ImageStore;

use super::{FrameCanvas, Viewport};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixels surface error: {0}")]
    Surface(#[from] pixels::Error),
    #[error("pixels texture error: {0}")]
    Texture(#[from] TextureError),
}

/// Presents a fixed-size logical framebuffer, scaled to the window surface.
pub struct Renderer {
    pixels: Pixels<'static>,
    viewport: Viewport,
    images: ImageStore,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        viewport: Viewport,
        images: ImageStore,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(viewport.width, viewport.height, surface)?;
        Ok(Self {
            pixels,
            viewport,
            images,
        })
    }

    /// A minimized window reports a zero-sized surface; that resize is skipped.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if let Some((width, height)) = drawable_surface_size(width, height) {
            self.pixels.resize_surface(width, height)?;
        }
        Ok(())
    }

    pub fn render_frame(
        &mut self,
        draw: impl FnOnce(&mut FrameCanvas<'_>),
    ) -> Result<(), RenderError> {
        let Viewport { width, height } = self.viewport;
        let frame = self.pixels.frame_mut();
        if let Some(mut canvas) = FrameCanvas::new(frame, width, height, &self.images) {
            draw(&mut canvas);
        }
        self.pixels.render()?;
        Ok(())
    }
}

fn drawable_surface_size(width: u32, height: u32) -> Option<(u32, u32)> {
    (width > 0 && height > 0).then_some((width, height))
}
