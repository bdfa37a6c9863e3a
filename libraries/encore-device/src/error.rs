/// Device errors
use thiserror::Error;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Device errors
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The progression thread could not be started
    #[error("Failed to spawn device thread: {0}")]
    Spawn(#[from] std::io::Error),
}
