use crate::tuning::AnimationTuning;

use super::body::{Facing, KinematicBody};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimState {
    #[default]
    Idle,
    Walk,
    Jump,
}

impl AnimState {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Walk => "walk",
            AnimState::Jump => "jump",
        }
    }

    fn index(self) -> usize {
        match self {
            AnimState::Idle => 0,
            AnimState::Walk => 1,
            AnimState::Jump => 2,
        }
    }
}

fn facing_index(facing: Facing) -> usize {
    match facing {
        Facing::Left => 0,
        Facing::Right => 1,
    }
}

/// Frame count for every state and facing pair. Counts are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounts {
    counts: [[usize; 2]; 3],
}

impl FrameCounts {
    pub fn new(idle: [usize; 2], walk: [usize; 2], jump: [usize; 2]) -> Self {
        let at_least_one = |pair: [usize; 2]| pair.map(|count| count.max(1));
        Self {
            counts: [at_least_one(idle), at_least_one(walk), at_least_one(jump)],
        }
    }

    /// Same count for both facings.
    pub fn symmetric(idle: usize, walk: usize, jump: usize) -> Self {
        Self::new([idle; 2], [walk; 2], [jump; 2])
    }

    pub fn get(&self, state: AnimState, facing: Facing) -> usize {
        self.counts[state.index()][facing_index(facing)]
    }
}

pub fn select_state(on_ground: bool, velocity_x: f32, walk_deadzone: f32) -> AnimState {
    if !on_ground {
        AnimState::Jump
    } else if velocity_x.abs() > walk_deadzone {
        AnimState::Walk
    } else {
        AnimState::Idle
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Animator {
    state: AnimState,
    frame_time: f32,
    frame_index: usize,
}

impl Animator {
    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Advances the current clip, then restarts it if the state changed this tick.
    pub fn update(
        &mut self,
        body: &KinematicBody,
        dt: f32,
        counts: &FrameCounts,
        tuning: &AnimationTuning,
    ) {
        let next = select_state(body.on_ground, body.velocity.x, tuning.walk_deadzone);
        let count = counts.get(next, body.facing);

        self.frame_time += dt;
        if self.frame_time >= tuning.frame_seconds(next) {
            self.frame_time = 0.0;
            self.frame_index = (self.frame_index + 1) % count;
        }

        if next != self.state {
            self.state = next;
            self.frame_index = 0;
            self.frame_time = 0.0;
        }

        // Facing can change mid-clip between pairs with different lengths.
        self.frame_index %= count;
    }
}
