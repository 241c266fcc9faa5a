mod font;
mod overlay;

pub(crate) use font::draw_text_clipped;
pub(crate) use overlay::{draw_overlay, draw_startup_failure, OverlayData};
