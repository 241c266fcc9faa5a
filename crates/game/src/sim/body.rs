use engine::Vec2;

use crate::tuning::PhysicsTuning;

use super::jump::JumpAssist;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Axis-aligned player body. `position` is the top-left corner of the box.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub on_ground: bool,
    pub facing: Facing,
    pub jump: JumpAssist,
    size: Vec2,
    spawn: Vec2,
}

impl KinematicBody {
    pub fn new(spawn: Vec2, size: Vec2) -> Self {
        Self {
            position: spawn,
            velocity: Vec2::ZERO,
            on_ground: false,
            facing: Facing::default(),
            jump: JumpAssist::default(),
            size,
            spawn,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.x / 2.0,
            self.position.y + self.size.y / 2.0,
        )
    }

    /// Left is applied before right, so holding both ends on the right-hand
    /// result and facing right.
    pub fn apply_run_input(
        &mut self,
        move_left: bool,
        move_right: bool,
        dt: f32,
        physics: &PhysicsTuning,
    ) {
        let speed_step = physics.run_accel * dt;
        if move_left {
            self.velocity.x = (self.velocity.x - speed_step).max(-physics.run_speed);
            self.facing = Facing::Left;
        }
        if move_right {
            self.velocity.x = (self.velocity.x + speed_step).min(physics.run_speed);
            self.facing = Facing::Right;
        }
        if !move_left && !move_right {
            self.velocity.x = decay_toward_zero(self.velocity.x, physics.friction * dt);
        }
    }

    pub fn apply_jump_impulse(&mut self, physics: &PhysicsTuning) {
        self.velocity.y = -physics.jump_impulse;
        self.on_ground = false;
    }

    pub fn apply_gravity(&mut self, dt: f32, physics: &PhysicsTuning) {
        self.velocity.y = (self.velocity.y + physics.gravity * dt).min(physics.max_fall_speed);
    }

    /// Returns true when the body fell past `kill_y` and was moved back to spawn.
    pub fn respawn_below(&mut self, kill_y: f32) -> bool {
        if self.position.y <= kill_y {
            return false;
        }
        self.position = self.spawn;
        self.velocity = Vec2::ZERO;
        true
    }
}

fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        value
    }
}
