mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig, SceneBuildError, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    visible_tile_rect, world_to_screen_px, DrawTarget, FrameCanvas, LayerRepeat, ParallaxLayer,
    RenderError, Renderer, TileRect, TileSheet, Viewport,
};
pub use scene::{Scene, SceneCommand, Vec2};
