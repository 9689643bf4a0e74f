//! Driver state for one host session.

use std::sync::Arc;

use crate::audio::AudioPipeline;
use crate::config::Settings;
use crate::error::Result;
use crate::registry::BackendRegistry;
use crate::video::VideoInputPipeline;

/// Active drivers of a host session.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use avdriver::{BackendRegistry, DriverState, Settings};
///
/// let mut drivers = DriverState::new(Arc::new(BackendRegistry::builtin()));
/// let mut settings = Settings::default();
/// settings.audio.driver = "null".into();
///
/// drivers.init_drivers(&settings)?;
/// assert!(drivers.audio_active());
/// drivers.uninit_drivers();
/// # Ok::<(), avdriver::Error>(())
/// ```
#[derive(Debug)]
pub struct DriverState {
    registry: Arc<BackendRegistry>,
    video: VideoInputPipeline,
    audio: AudioPipeline,
}

impl DriverState {
    /// Create driver state that selects from `registry`.
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self::with_audio_pipeline(registry, AudioPipeline::new())
    }

    /// Create driver state around a preconfigured audio pipeline.
    pub fn with_audio_pipeline(registry: Arc<BackendRegistry>, audio: AudioPipeline) -> Self {
        Self {
            registry,
            video: VideoInputPipeline::new(),
            audio,
        }
    }

    /// Initialize video and input, then audio.
    ///
    /// On error, whatever was opened stays recorded so that
    /// [`uninit_drivers`](Self::uninit_drivers) can release it.
    pub fn init_drivers(&mut self, settings: &Settings) -> Result<()> {
        self.video.init(&self.registry, settings)?;
        self.audio.init(&self.registry, &settings.audio)?;
        tracing::info!(audio_active = self.audio.is_active(), "Drivers initialized");
        Ok(())
    }

    /// Release video and input, then audio.
    pub fn uninit_drivers(&mut self) {
        self.video.uninit();
        self.audio.uninit();
    }

    /// The backend registry.
    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    /// Whether the host may use audio.
    pub fn audio_active(&self) -> bool {
        self.audio.is_active()
    }

    /// The audio pipeline.
    pub fn audio(&self) -> &AudioPipeline {
        &self.audio
    }

    /// The audio pipeline, mutably.
    pub fn audio_mut(&mut self) -> &mut AudioPipeline {
        &mut self.audio
    }

    /// The video and input pipeline.
    pub fn video(&self) -> &VideoInputPipeline {
        &self.video
    }

    /// The video and input pipeline, mutably.
    pub fn video_mut(&mut self) -> &mut VideoInputPipeline {
        &mut self.video
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::video::InputOwnership;

    fn null_settings() -> Settings {
        let mut settings = Settings::default();
        settings.audio.driver = "null".into();
        settings
    }

    #[test]
    fn test_init_and_uninit() {
        let mut drivers = DriverState::new(Arc::new(BackendRegistry::builtin()));
        drivers.init_drivers(&null_settings()).unwrap();

        assert!(drivers.audio_active());
        assert!(drivers.video().is_ready());
        assert_eq!(drivers.video().ownership(), Some(InputOwnership::Separate));

        drivers.uninit_drivers();
        assert!(!drivers.audio_active());
        assert!(!drivers.video().is_ready());
        drivers.uninit_drivers();
    }

    #[test]
    fn test_video_failure_skips_audio() {
        let mut drivers = DriverState::new(Arc::new(BackendRegistry::builtin()));
        let mut settings = null_settings();
        settings.video.driver = "missing".into();

        assert!(matches!(
            drivers.init_drivers(&settings),
            Err(Error::BackendNotFound(_))
        ));
        assert!(drivers.audio().buffers().is_none());
        drivers.uninit_drivers();
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(BackendRegistry::builtin());
        let drivers = DriverState::new(Arc::clone(&registry));
        assert!(Arc::ptr_eq(drivers.registry(), &registry));
    }
}
