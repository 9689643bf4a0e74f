//! Error types for avdriver.

use thiserror::Error;

use crate::backend::BackendError;
use crate::registry::{BackendNotFound, DeviceClass};

/// Result type alias using avdriver's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for driver initialization.
///
/// Which of these are fatal depends on the device class: audio degrades to
/// inactive on `BackendNotFound` and `BackendInit`, while video and input
/// return them to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured driver name is not compiled in.
    #[error(transparent)]
    BackendNotFound(#[from] BackendNotFound),

    /// A driver was found but could not construct its device.
    #[error("failed to initialize {class} driver \"{ident}\": {source}")]
    BackendInit {
        /// Device class of the failing driver.
        class: DeviceClass,
        /// Identifier of the failing driver.
        ident: String,
        /// Error reported by the backend.
        #[source]
        source: BackendError,
    },

    /// No input driver is available to fall back on.
    #[error("cannot find an input driver")]
    NoInputDriver,

    /// Output rate exceeds the supported resampling ratio.
    #[error(
        "audio output rate {output_rate} Hz must be below {max_ratio} x input rate {input_rate} Hz"
    )]
    RateRatio {
        /// Emulated core sample rate.
        input_rate: u32,
        /// Device sample rate.
        output_rate: u32,
        /// Maximum permitted output/input ratio.
        max_ratio: u32,
    },

    /// Memory allocation failed.
    #[error("memory allocation failed: {0}")]
    AllocationFailed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed settings file.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::BackendInit`] from a backend failure.
    pub fn backend_init(class: DeviceClass, ident: &str, source: BackendError) -> Self {
        Error::BackendInit {
            class,
            ident: ident.to_string(),
            source,
        }
    }

    /// Identifiers to show the user when this error is a lookup failure.
    pub fn available_backends(&self) -> Option<&[String]> {
        match self {
            Error::BackendNotFound(e) => Some(&e.available),
            _ => None,
        }
    }
}
