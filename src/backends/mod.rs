//! Compiled-in backends.
//!
//! | Class | Backend | Feature |
//! |-------|---------|---------|
//! | Audio | `alsa` | `alsa` |
//! | Audio | `file` | - |
//! | Audio | `null` | - |
//! | Video | `null` | - |
//! | Input | `null` | - |
//!
//! [`BackendRegistry::builtin`](crate::registry::BackendRegistry::builtin)
//! registers whichever of these are compiled in.

#[cfg(feature = "alsa")]
mod alsa;
mod file;
mod null;

#[cfg(feature = "alsa")]
pub use self::alsa::{AlsaAudioDevice, AlsaAudioDriver, is_available as alsa_available};
pub use file::{FileAudioDevice, FileAudioDriver};
pub use null::{
    NullAudioDevice, NullAudioDriver, NullInputDevice, NullInputDriver, NullVideoDevice,
    NullVideoDriver,
};
