use engine::{InputAction, InputSnapshot, Vec2};

use crate::tuning::Tuning;

use super::animation::{Animator, FrameCounts};
use super::body::KinematicBody;
use super::camera::Camera;
use super::collision::{resolve_horizontal, resolve_vertical, Contact};
use super::world::TileWorld;

/// What happened during one tick, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub jumped: bool,
    /// Touched down this tick after starting it airborne.
    pub landed: bool,
    pub hit_wall: bool,
    pub respawned: bool,
}

/// All mutable game state plus the immutable world it runs in.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: TileWorld,
    body: KinematicBody,
    camera: Camera,
    animator: Animator,
    frame_counts: FrameCounts,
    viewport: Vec2,
    tuning: Tuning,
}

impl Simulation {
    pub fn new(
        world: TileWorld,
        body: KinematicBody,
        viewport: Vec2,
        frame_counts: FrameCounts,
        tuning: Tuning,
    ) -> Self {
        Self {
            world,
            body,
            camera: Camera::default(),
            animator: Animator::default(),
            frame_counts,
            viewport,
            tuning,
        }
    }

    /// Runs one tick: run input, jump assist, gravity, horizontal then
    /// vertical collision, respawn, camera, animation.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> TickEvents {
        let physics = &self.tuning.physics;
        let was_grounded = self.body.on_ground;

        self.body.apply_run_input(
            input.is_held(InputAction::MoveLeft),
            input.is_held(InputAction::MoveRight),
            dt,
            physics,
        );

        let jumped = self.body.jump.update(
            physics.jump_windows(),
            input.was_pressed(InputAction::Jump),
            self.body.on_ground,
            dt,
        );
        if jumped {
            self.body.apply_jump_impulse(physics);
        }
        self.body.apply_gravity(dt, physics);

        let horizontal = resolve_horizontal(&mut self.body, &self.world, dt);
        let vertical = resolve_vertical(&mut self.body, &self.world, dt);

        let kill_y = self.world.pixel_height() + self.tuning.world.respawn_margin_px;
        let respawned = self.body.respawn_below(kill_y);

        let world_size = self.world_pixel_size();
        self.camera.follow(
            self.body.center(),
            self.viewport,
            world_size,
            &self.tuning.camera,
        );
        self.animator.update(
            &self.body,
            dt,
            &self.frame_counts,
            &self.tuning.animation,
        );

        TickEvents {
            jumped,
            landed: !was_grounded && vertical == Some(Contact::Floor),
            hit_wall: horizontal == Some(Contact::Wall),
            respawned,
        }
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world_pixel_size(&self) -> Vec2 {
        Vec2::new(self.world.pixel_width(), self.world.pixel_height())
    }
}
