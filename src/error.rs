use thiserror::Error;

use crate::transition::Direction;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A style name that has no entry in the strategy registry.
    #[error("unknown transition style '{0}'")]
    UnknownStyle(String),

    /// A directional strategy that lacks one of its two members.
    #[error("transition style '{style}' has no {direction} member")]
    MissingDirection { style: String, direction: Direction },

    /// A configuration value outside its accepted range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
