use std::path::{Path, PathBuf};

use thiserror::Error;

/// Asset paths are relative, `/`-separated and stay inside the asset directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("asset path must not be empty")]
    Empty,
    #[error("asset path must be relative")]
    Absolute,
    #[error("asset path must not contain '\\\\'")]
    Backslash,
    #[error("asset path must not contain '..' segments")]
    ParentTraversal,
    #[error("asset path contains control character {code:#04x}")]
    ControlCharacter { code: u32 },
}

pub(crate) fn validate_asset_path(path: &str) -> Result<(), AssetPathError> {
    if path.is_empty() {
        return Err(AssetPathError::Empty);
    }
    if path.starts_with('/') {
        return Err(AssetPathError::Absolute);
    }
    if path.contains('\\') {
        return Err(AssetPathError::Backslash);
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(AssetPathError::ParentTraversal);
    }
    if let Some(ch) = path.chars().find(|ch| ch.is_control()) {
        return Err(AssetPathError::ControlCharacter { code: ch as u32 });
    }
    Ok(())
}

pub(crate) fn resolve_asset_path(asset_dir: &Path, path: &str) -> Result<PathBuf, AssetPathError> {
    validate_asset_path(path)?;
    Ok(path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(asset_dir.to_path_buf(), |acc, segment| acc.join(segment)))
}
