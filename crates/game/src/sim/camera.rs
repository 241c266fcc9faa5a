use engine::Vec2;

use crate::tuning::CameraTuning;

/// World coordinate shown at the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub position: Vec2,
}

impl Camera {
    /// Moves a fixed fraction of the way toward centring `focus`, then clamps
    /// to the world. The clamp is applied after smoothing, so the camera can
    /// snap at world edges.
    pub fn follow(
        &mut self,
        focus: Vec2,
        viewport: Vec2,
        world_size: Vec2,
        tuning: &CameraTuning,
    ) {
        let target = Vec2::new(focus.x - viewport.x / 2.0, focus.y - viewport.y / 2.0);
        self.position.x += (target.x - self.position.x) * tuning.follow_rate_x;
        self.position.y += (target.y - self.position.y) * tuning.follow_rate_y;

        self.position.x = clamp_axis(self.position.x, world_size.x, viewport.x);
        self.position.y = clamp_axis(self.position.y, world_size.y, viewport.y);
    }
}

fn clamp_axis(value: f32, world_extent: f32, view_extent: f32) -> f32 {
    value.clamp(0.0, (world_extent - view_extent).max(0.0))
}
