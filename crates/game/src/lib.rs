use engine::AssetError;
use thiserror::Error;

pub mod level;
pub mod resources;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use resources::{AnimationSet, GameResources};
pub use scene::PlatformerScene;
pub use sim::{LevelError, Simulation, TickEvents};
pub use tuning::{Tuning, TuningError};

/// Anything that stops the game from reaching its first tick.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
    #[error(transparent)]
    Tuning(#[from] TuningError),
}
