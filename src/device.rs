//! Capture device checks done before the framework is touched

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device {} not found", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fails if nothing exists at `path`. Only existence is checked, the node
/// is not opened or queried.
pub fn verify_exists(path: &Path) -> Result<(), DeviceError> {
    match std::fs::metadata(path) {
        Ok(_) => {
            log::debug!("Capture device {} present", path.display());
            Ok(())
        }
        Err(source) => Err(DeviceError::NotFound {
            path: path.to_path_buf(),
            source,
        }),
    }
}
