//! Host image file loading and shadow-rename persistence.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use fatvfs::{FsError, FsResult};
use log::{info, warn};

/// Read the whole image into memory.
pub fn load(path: &Path) -> FsResult<Vec<u8>> {
    fs::read(path).map_err(|err| {
        warn!("cannot read {}: {err}", path.display());
        FsError::Io
    })
}

/// The sibling path the shadow copy is written to.
pub fn shadow_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".shadow");
    PathBuf::from(name)
}

/// Persist the buffer crash-safely: write a complete shadow copy next to
/// the image, then rename it over the original. A failure before the
/// rename leaves the original untouched.
pub fn persist(path: &Path, buffer: &[u8]) -> FsResult<()> {
    let shadow = shadow_path(path);
    fs::write(&shadow, buffer).map_err(|err| {
        warn!("cannot write {}: {err}", shadow.display());
        FsError::Io
    })?;
    fs::rename(&shadow, path).map_err(|err| {
        warn!("cannot rename {} over {}: {err}", shadow.display(), path.display());
        FsError::Io
    })?;
    info!("written image to {}", path.display());
    Ok(())
}
