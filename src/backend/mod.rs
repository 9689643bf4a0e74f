//! Backend interfaces.
//!
//! A backend (driver) is a concrete implementation of one device class.
//! The core only ever talks to backends through the traits defined here:
//!
//! | Class | Factory | Constructed device |
//! |-------|---------|--------------------|
//! | Audio | [`AudioDriver`] | [`AudioDevice`] |
//! | Video | [`VideoDriver`] | [`VideoDevice`] (+ optional bundled [`InputDevice`]) |
//! | Input | [`InputDriver`] | [`InputDevice`] |
//!
//! Devices own their own I/O threading. Releasing a device is an explicit
//! `shutdown()` call made by the owning pipeline, so that a bundled input
//! device can be dropped without releasing the shared video resource twice.

mod traits;

pub use traits::{
    AudioDevice, AudioDriver, AudioParams, InputDevice, InputDriver, Samples, VideoDevice,
    VideoDriver, VideoInfo, VideoInit,
};

use thiserror::Error;

/// Errors reported by a backend while constructing its device.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Requested device does not exist.
    #[error("Device not found: {0}")]
    NotFound(String),

    /// Device is busy (in use by another application).
    #[error("Device busy: {0}")]
    Busy(String),

    /// Permission denied to access device.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Requested parameters are not supported by the device.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// I/O error while opening the device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ALSA-specific error.
    #[cfg(feature = "alsa")]
    #[error("ALSA error: {0}")]
    Alsa(String),

    /// Any other backend failure.
    #[error("{0}")]
    Other(String),
}
