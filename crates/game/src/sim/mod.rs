//! Per-tick platformer simulation: terrain lookup, body integration,
//! collision, jump assist, camera follow and animation selection.

mod animation;
mod body;
mod camera;
mod collision;
mod jump;
mod simulation;
mod world;

pub use animation::{select_state, AnimState, Animator, FrameCounts};
pub use body::{Facing, KinematicBody};
pub use camera::Camera;
pub use collision::{resolve_horizontal, resolve_vertical, Contact};
pub use jump::{JumpAssist, JumpWindows};
pub use simulation::{Simulation, TickEvents};
pub use world::{Legend, LevelError, TileKind, TileWorld, FILLER_CODE};
