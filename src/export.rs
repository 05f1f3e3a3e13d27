//! Writing image references to disk

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudioError};
use crate::image_ref::{ImageRef, extension_for_mime};
use crate::log_info;

/// Turn a display name into a safe file stem
pub fn slugify(name: &str) -> String {
    let slug = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}

/// Write `image` to exactly `path`
pub fn write_image(image: &ImageRef, path: &Path) -> Result<()> {
    let bytes = image
        .to_bytes()
        .map_err(|e| StudioError::io("Image payload is corrupt", std::io::Error::other(e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| StudioError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| StudioError::io(format!("Failed to write {}", path.display()), e))?;
    log_info!("Wrote {}", path.display());
    Ok(())
}

/// Write `image` into `dir` as `<stem>-<timestamp>.<ext>` and return the path
pub fn save_to_dir(image: &ImageRef, dir: &Path, stem: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
    let file_name = format!(
        "{}-{}.{}",
        slugify(stem),
        timestamp,
        extension_for_mime(image.mime())
    );
    let path = dir.join(file_name);
    write_image(image, &path)?;
    Ok(path)
}
