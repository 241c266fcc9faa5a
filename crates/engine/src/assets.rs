use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use crate::asset_paths::{resolve_asset_path, AssetPathError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(u32);

impl ImageHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedImage {
    /// Returns `None` when `rgba` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}

/// Immutable once startup is over; the renderer only reads from it.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: Vec<LoadedImage>,
}

impl ImageStore {
    pub fn insert(&mut self, image: LoadedImage) -> ImageHandle {
        let handle = ImageHandle(self.images.len() as u32);
        self.images.push(image);
        handle
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&LoadedImage> {
        self.images.get(handle.index())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: AssetPathError,
    },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("frame sequence '{base_path}' must contain at least one frame")]
    EmptySequence { base_path: String },
}

pub trait AssetLoader {
    fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError>;

    /// Loads `base_path/1.png` through `base_path/count.png` in order.
    fn load_frame_sequence(
        &mut self,
        base_path: &str,
        count: usize,
    ) -> Result<Vec<ImageHandle>, AssetError> {
        if count == 0 {
            return Err(AssetError::EmptySequence {
                base_path: base_path.to_string(),
            });
        }
        (1..=count)
            .map(|index| self.load_image(&frame_path(base_path, index)))
            .collect()
    }
}

fn frame_path(base_path: &str, index: usize) -> String {
    format!("{}/{index}.png", base_path.trim_end_matches('/'))
}

pub struct FsAssetLoader {
    asset_dir: PathBuf,
    store: ImageStore,
}

impl FsAssetLoader {
    pub fn new(asset_dir: PathBuf) -> Self {
        Self {
            asset_dir,
            store: ImageStore::default(),
        }
    }

    pub fn into_store(self) -> ImageStore {
        self.store
    }
}

impl AssetLoader for FsAssetLoader {
    fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError> {
        let resolved =
            resolve_asset_path(&self.asset_dir, path).map_err(|source| AssetError::InvalidPath {
                path: path.to_string(),
                source,
            })?;
        let image = decode_rgba(&resolved)?;
        debug!(
            path = %resolved.display(),
            width = image.width,
            height = image.height,
            "image_loaded"
        );
        Ok(self.store.insert(image))
    }
}

fn decode_rgba(path: &Path) -> Result<LoadedImage, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(LoadedImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};

    use super::*;

    fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(path)
            .expect("write png");
    }

    #[test]
    fn loads_image_into_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(&dir.path().join("Sprites/sheet.png"), 4, 2, [1, 2, 3, 255]);

        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        let handle = loader.load_image("Sprites/sheet.png").expect("load");
        let store = loader.into_store();

        let image = store.get(handle).expect("stored image");
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.pixel(3, 1), [1, 2, 3, 255]);
    }

    #[test]
    fn frame_sequence_is_one_based_and_ordered() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (index, shade) in [(1u8, 10u8), (2, 20), (3, 30)] {
            write_png(
                &dir.path().join(format!("Anim Base/walk/right/{index}.png")),
                1,
                1,
                [shade, 0, 0, 255],
            );
        }

        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        let frames = loader
            .load_frame_sequence("Anim Base/walk/right", 3)
            .expect("sequence");
        let store = loader.into_store();

        let shades: Vec<u8> = frames
            .iter()
            .map(|handle| store.get(*handle).expect("frame").pixel(0, 0)[0])
            .collect();
        assert_eq!(shades, vec![10, 20, 30]);
    }

    #[test]
    fn missing_frame_aborts_whole_sequence() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(&dir.path().join("idle/1.png"), 1, 1, [0, 0, 0, 255]);

        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        let error = loader.load_frame_sequence("idle", 2).expect_err("missing");
        match error {
            AssetError::Open { path, .. } => assert!(path.ends_with("idle/2.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        assert!(matches!(
            loader.load_frame_sequence("idle", 0),
            Err(AssetError::EmptySequence { .. })
        ));
    }

    #[test]
    fn undecodable_file_reports_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.png"), b"not a png").expect("write");

        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        assert!(matches!(
            loader.load_image("broken.png"),
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn escaping_path_is_rejected_before_touching_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut loader = FsAssetLoader::new(dir.path().to_path_buf());
        assert!(matches!(
            loader.load_image("../outside.png"),
            Err(AssetError::InvalidPath { .. })
        ));
    }

    #[test]
    fn from_rgba_checks_buffer_length() {
        assert!(LoadedImage::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(LoadedImage::from_rgba(2, 2, vec![0; 15]).is_none());
    }
}
