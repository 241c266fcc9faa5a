use super::input::InputSnapshot;
use super::rendering::DrawTarget;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// A running game owned by the loop runner.
///
/// The runner calls `update` once per presented frame with the clamped frame
/// delta, then `render` into the frame's draw target.
pub trait Scene {
    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self, target: &mut dyn DrawTarget);
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
    fn shutdown(&mut self) {}
}
