use engine::{AssetError, AssetLoader, ImageHandle};
use tracing::info;

use crate::sim::{AnimState, Facing, FrameCounts};

pub const TILE_SHEET_PATH: &str = "Sprites/tilesetOpenGame.png";
pub const SKY_PATH: &str = "Sprites/tilesetOpenGameBackground.png";
pub const OCEAN_PATH: &str = "Sprites/Ocean_SpriteSheet.png";
pub const CHARACTER_BASE_PATH: &str = "Sprites/Cellin Base/standard";

const IDLE_FRAMES: usize = 2;
const WALK_FRAMES: usize = 9;
const JUMP_FRAMES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub left: Vec<ImageHandle>,
    pub right: Vec<ImageHandle>,
}

impl Clip {
    fn frames(&self, facing: Facing) -> &[ImageHandle] {
        match facing {
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        }
    }

    fn counts(&self) -> [usize; 2] {
        [self.left.len(), self.right.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSet {
    pub idle: Clip,
    pub walk: Clip,
    pub jump: Clip,
}

impl AnimationSet {
    pub fn clip(&self, state: AnimState) -> &Clip {
        match state {
            AnimState::Idle => &self.idle,
            AnimState::Walk => &self.walk,
            AnimState::Jump => &self.jump,
        }
    }

    pub fn frame_counts(&self) -> FrameCounts {
        FrameCounts::new(self.idle.counts(), self.walk.counts(), self.jump.counts())
    }

    pub fn frame(&self, state: AnimState, facing: Facing, index: usize) -> Option<ImageHandle> {
        let frames = self.clip(state).frames(facing);
        if frames.is_empty() {
            return None;
        }
        frames.get(index % frames.len()).copied()
    }
}

/// Every image the game draws, loaded before the first tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResources {
    pub tile_sheet: ImageHandle,
    pub sky: ImageHandle,
    pub ocean: ImageHandle,
    pub animations: AnimationSet,
}

impl GameResources {
    /// Fails on the first missing or undecodable image.
    pub fn load(loader: &mut dyn AssetLoader) -> Result<Self, AssetError> {
        let tile_sheet = loader.load_image(TILE_SHEET_PATH)?;
        let sky = loader.load_image(SKY_PATH)?;
        let ocean = loader.load_image(OCEAN_PATH)?;

        let animations = AnimationSet {
            idle: load_clip(loader, AnimState::Idle, IDLE_FRAMES)?,
            walk: load_clip(loader, AnimState::Walk, WALK_FRAMES)?,
            jump: load_clip(loader, AnimState::Jump, JUMP_FRAMES)?,
        };
        info!(
            images = 3 + 2 * (IDLE_FRAMES + WALK_FRAMES + JUMP_FRAMES),
            "game_resources_loaded"
        );
        Ok(Self {
            tile_sheet,
            sky,
            ocean,
            animations,
        })
    }
}

fn load_clip(
    loader: &mut dyn AssetLoader,
    state: AnimState,
    frame_count: usize,
) -> Result<Clip, AssetError> {
    let base = format!("{CHARACTER_BASE_PATH}/{}", state.as_str());
    let right = loader.load_frame_sequence(&format!("{base}/right"), frame_count)?;
    let left = loader.load_frame_sequence(&format!("{base}/left"), frame_count)?;
    Ok(Clip { left, right })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct RecordingLoader {
        loaded: Vec<String>,
        fail_on: Option<&'static str>,
        handles: HashMap<String, ImageHandle>,
        store: engine::ImageStore,
    }

    impl AssetLoader for RecordingLoader {
        fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError> {
            if self.fail_on == Some(path) {
                return Err(AssetError::Open {
                    path: path.into(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.loaded.push(path.to_string());
            let image = engine::LoadedImage::from_rgba(1, 1, vec![0; 4]).expect("image");
            let handle = self.store.insert(image);
            self.handles.insert(path.to_string(), handle);
            Ok(handle)
        }
    }

    #[test]
    fn loads_every_original_asset_path() {
        let mut loader = RecordingLoader::default();
        let resources = GameResources::load(&mut loader).expect("resources");

        assert_eq!(loader.loaded.len(), 3 + 2 * (2 + 9 + 5));
        assert_eq!(loader.handles[TILE_SHEET_PATH], resources.tile_sheet);
        assert!(loader
            .loaded
            .contains(&"Sprites/Cellin Base/standard/walk/left/9.png".to_string()));
        assert_eq!(
            resources.animations.frame_counts(),
            FrameCounts::symmetric(2, 9, 5)
        );
    }

    #[test]
    fn one_missing_frame_aborts_loading() {
        let mut loader = RecordingLoader {
            fail_on: Some("Sprites/Cellin Base/standard/jump/left/3.png"),
            ..RecordingLoader::default()
        };
        assert!(matches!(
            GameResources::load(&mut loader),
            Err(AssetError::Open { .. })
        ));
    }

    #[test]
    fn frame_lookup_wraps_index() {
        let mut loader = RecordingLoader::default();
        let resources = GameResources::load(&mut loader).expect("resources");
        let first = resources.animations.frame(AnimState::Idle, Facing::Right, 0);
        let wrapped = resources.animations.frame(AnimState::Idle, Facing::Right, 2);
        assert_eq!(first, wrapped);
        assert!(first.is_some());
    }
}
