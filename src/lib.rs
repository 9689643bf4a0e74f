//! # avdriver
//!
//! Driver selection and initialization for an emulator-style host.
//!
//! A host has three device classes to drive: audio output, video output and
//! input. Each class has several compiled-in backends ("drivers") and the
//! configuration names the one to use. This crate resolves those names,
//! opens the devices, and sets up the audio path: fixed-size buffers sized
//! for the worst-case resampling ratio, a resampler, and the chunk size for
//! blocking or non-blocking output.
//!
//! ## Failure policy
//!
//! - Video and input are mandatory. Any failure is returned as an [`Error`].
//! - Audio is best effort. A missing driver, a device that fails to open, or
//!   a resampler that cannot be built leaves audio inactive.
//! - An output rate of 16× the input rate or more, and a failed buffer
//!   allocation, are fatal for audio too.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use avdriver::prelude::*;
//!
//! let registry = Arc::new(BackendRegistry::builtin());
//! let mut drivers = DriverState::new(registry);
//!
//! let mut settings = Settings::default();
//! settings.audio.driver = "null".into();
//! settings.audio.sync = false;
//!
//! drivers.init_drivers(&settings)?;
//! assert_eq!(drivers.audio().chunk_size(), 2048);
//! drivers.uninit_drivers();
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audio;
pub mod backend;
pub mod backends;
pub mod config;
pub mod driver;
pub mod error;
pub mod registry;
pub mod video;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audio::{AudioBuffers, AudioPipeline, Resampler, ResamplerQuality};
    pub use crate::backend::{
        AudioDevice, AudioDriver, BackendError, InputDevice, InputDriver, VideoDevice,
        VideoDriver,
    };
    pub use crate::config::Settings;
    pub use crate::driver::DriverState;
    pub use crate::error::{Error, Result};
    pub use crate::registry::{BackendRegistry, DeviceClass};
    pub use crate::video::{InputOwnership, VideoInputPipeline};
}

pub use config::Settings;
pub use driver::DriverState;
pub use error::{Error, Result};
pub use registry::BackendRegistry;
