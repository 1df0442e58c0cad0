/// Error types for loading and registry lookups.
///
/// The simulation itself never fails: runtime invariants are kept by
/// clamping and single-fire flags. Errors only come out of startup work
/// (config and level files) and name-keyed lookups.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A resource file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resource file was read but is not valid RON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Level data that parsed fine but cannot be simulated.
    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("unknown sound: {0}")]
    UnknownSound(String),

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("unknown button: {0}")]
    UnknownButton(String),

    #[error("unknown slider: {0}")]
    UnknownSlider(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Read a RON document from disk, tagging failures with the path.
pub(crate) fn read_ron<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| GameError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
