//! Driver settings.
//!
//! Settings are read from a JSON file. Every field has a default, so a file
//! only needs the values it changes:
//!
//! ```json
//! {
//!     "audio": { "driver": "file", "device": "out.pcm", "sync": false },
//!     "video": { "xscale": 2.0, "yscale": 2.0, "filter": "HQ2X" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::ResamplerQuality;
use crate::error::{Error, Result};

/// Audio driver selected when none is configured.
#[cfg(feature = "alsa")]
pub const DEFAULT_AUDIO_DRIVER: &str = "alsa";
/// Audio driver selected when none is configured.
#[cfg(not(feature = "alsa"))]
pub const DEFAULT_AUDIO_DRIVER: &str = "null";
/// Video driver selected when none is configured.
pub const DEFAULT_VIDEO_DRIVER: &str = "null";
/// Input driver selected when none is configured.
pub const DEFAULT_INPUT_DRIVER: &str = "null";

/// All settings consumed by driver initialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio output settings.
    pub audio: AudioSettings,
    /// Video output settings.
    pub video: VideoSettings,
    /// Input settings.
    pub input: InputSettings,
}

impl Settings {
    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Reject values no driver can work with.
    ///
    /// The audio rate ratio is checked at init time, not here.
    pub fn validate(&self) -> Result<()> {
        if self.audio.enable && (self.audio.out_rate == 0 || self.audio.in_rate == 0) {
            return Err(Error::Config("audio rates must be non-zero".into()));
        }
        if !self.video.fullscreen
            && !(self.video.xscale.is_finite()
                && self.video.yscale.is_finite()
                && self.video.xscale > 0.0
                && self.video.yscale > 0.0)
        {
            return Err(Error::Config(format!(
                "invalid video scale {}x{}",
                self.video.xscale, self.video.yscale
            )));
        }
        Ok(())
    }
}

/// Audio output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Enable audio output.
    pub enable: bool,
    /// Audio driver identifier.
    pub driver: String,
    /// Device string passed to the driver. Empty selects its default.
    pub device: String,
    /// Device sample rate in Hz.
    pub out_rate: u32,
    /// Emulated core sample rate in Hz.
    pub in_rate: u32,
    /// Target latency in milliseconds.
    pub latency: u32,
    /// Pace emulation by audio (blocking writes).
    pub sync: bool,
    /// Resampler quality.
    pub src_quality: ResamplerQuality,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enable: true,
            driver: DEFAULT_AUDIO_DRIVER.to_string(),
            device: String::new(),
            out_rate: 48000,
            in_rate: 32040,
            latency: 64,
            sync: true,
            src_quality: ResamplerQuality::default(),
        }
    }
}

/// Video output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Video driver identifier.
    pub driver: String,
    /// Start in fullscreen.
    pub fullscreen: bool,
    /// Fullscreen width in pixels.
    pub fullscreen_x: u32,
    /// Fullscreen height in pixels.
    pub fullscreen_y: u32,
    /// Windowed horizontal scale.
    pub xscale: f32,
    /// Windowed vertical scale.
    pub yscale: f32,
    /// Wait for vertical sync.
    pub vsync: bool,
    /// Keep the aspect ratio when scaling.
    pub force_aspect: bool,
    /// Bilinear filtering.
    pub smooth: bool,
    /// Post-processing filter name ("HQ2X", "HQ4X", "NTSC"). Empty for none.
    pub filter: String,
    /// The active filter produces 32-bit color.
    pub rgb32: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            driver: DEFAULT_VIDEO_DRIVER.to_string(),
            fullscreen: false,
            fullscreen_x: 1280,
            fullscreen_y: 720,
            xscale: 3.0,
            yscale: 3.0,
            vsync: true,
            force_aspect: true,
            smooth: true,
            filter: String::new(),
            rgb32: false,
        }
    }
}

/// Input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Input driver identifier.
    pub driver: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            driver: DEFAULT_INPUT_DRIVER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.audio.enable);
        assert!(settings.audio.sync);
        assert_eq!(settings.audio.out_rate, 48000);
        assert_eq!(settings.audio.in_rate, 32040);
        assert_eq!(settings.audio.latency, 64);
        assert_eq!(settings.audio.src_quality, ResamplerQuality::Medium);
        assert_eq!(settings.video.driver, "null");
        assert_eq!(settings.input.driver, "null");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "audio": { "sync": false, "src_quality": "fast" },
            "video": { "filter": "NTSC" }
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert!(!settings.audio.sync);
        assert_eq!(settings.audio.src_quality, ResamplerQuality::Fast);
        assert_eq!(settings.audio.out_rate, 48000);
        assert_eq!(settings.video.filter, "NTSC");
        assert_eq!(settings.input, InputSettings::default());
    }

    #[test]
    fn test_malformed_json() {
        let result = Settings::from_json_str("{ \"audio\": ");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let result = Settings::from_json_str(r#"{ "video": { "xscale": 0.0 } }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "input": {{ "driver": "sdl" }} }}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.input.driver, "sdl");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
