//! Video and input initialization.
//!
//! Unlike audio, video and input are mandatory: every failure here is
//! returned to the caller.
//!
//! A video driver may hand back its own input device (a windowing backend
//! that also reads the keyboard, say). That input shares the video device's
//! resources, so it is tagged [`InputOwnership::Bundled`] and released
//! together with the video device. Otherwise the configured input driver is
//! opened on its own and tagged [`InputOwnership::Separate`].

use super::geometry::{RenderGeometry, VideoFilter};
use crate::backend::{InputDevice, InputDriver, VideoDevice, VideoDriver, VideoInfo};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::registry::{BackendDescriptor, BackendRegistry, DeviceClass};

/// Who owns the active input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOwnership {
    /// Provided by the video device and released with it.
    Bundled,
    /// Opened from the input driver and released on its own.
    Separate,
}

/// Progress of [`VideoInputPipeline::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing resolved or constructed.
    #[default]
    Uninitialized,
    /// Video and input drivers resolved.
    VideoResolved,
    /// Video device constructed.
    VideoConstructed,
    /// The video device supplied the input device.
    InputBundled,
    /// The input device was constructed separately.
    InputSeparateConstructed,
    /// Both devices are usable.
    Ready,
}

/// Owns the video device and the input device.
#[derive(Default)]
pub struct VideoInputPipeline {
    state: PipelineState,
    video_driver: Option<BackendDescriptor<dyn VideoDriver>>,
    input_driver: Option<BackendDescriptor<dyn InputDriver>>,
    video: Option<Box<dyn VideoDevice>>,
    input: Option<Box<dyn InputDevice>>,
    ownership: Option<InputOwnership>,
    geometry: Option<RenderGeometry>,
    filter: VideoFilter,
}

impl VideoInputPipeline {
    /// Create an uninitialized pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the video and input drivers and open their devices.
    ///
    /// On error, devices that were opened stay owned by the pipeline until
    /// [`uninit`](Self::uninit).
    pub fn init(&mut self, registry: &BackendRegistry, settings: &Settings) -> Result<()> {
        if self.state != PipelineState::Uninitialized {
            self.uninit();
        }

        let video_driver = registry.resolve_video(&settings.video.driver)?.clone();
        let input_driver = registry.resolve_input(&settings.input.driver)?.clone();
        tracing::info!(
            video = video_driver.ident(),
            input = input_driver.ident(),
            "Selected video and input drivers"
        );
        self.input_driver = Some(input_driver);
        self.transition(PipelineState::VideoResolved);

        let geometry = RenderGeometry::compute(&settings.video);
        let filter = VideoFilter::from_name(&settings.video.filter);
        if filter == VideoFilter::None && !settings.video.filter.is_empty() {
            tracing::warn!(filter = %settings.video.filter, "Unknown video filter, ignoring");
        }
        self.geometry = Some(geometry);
        self.filter = filter;

        let info = VideoInfo {
            width: geometry.width,
            height: geometry.height,
            fullscreen: settings.video.fullscreen,
            vsync: settings.video.vsync,
            force_aspect: settings.video.force_aspect,
            smooth: settings.video.smooth,
            input_scale: filter.upscale(),
            rgb32: settings.video.rgb32,
        };

        let init = video_driver
            .driver()
            .init(&info)
            .map_err(|e| Error::backend_init(DeviceClass::Video, video_driver.ident(), e))?;
        tracing::info!(
            driver = video_driver.ident(),
            width = info.width,
            height = info.height,
            input_scale = info.input_scale,
            "Opened video device"
        );
        let video_caps = video_driver.capabilities();
        self.video = Some(init.video);
        self.video_driver = Some(video_driver);
        self.transition(PipelineState::VideoConstructed);

        match init.input {
            Some(input) => {
                if !video_caps.bundled_input {
                    tracing::warn!(
                        driver = self.video_ident().unwrap_or_default(),
                        "Video driver returned an input device without advertising one"
                    );
                }
                self.input = Some(input);
                self.ownership = Some(InputOwnership::Bundled);
                self.transition(PipelineState::InputBundled);
            }
            None => {
                let driver = self.input_driver.as_ref().ok_or(Error::NoInputDriver)?;
                let input = driver
                    .driver()
                    .init()
                    .map_err(|e| Error::backend_init(DeviceClass::Input, driver.ident(), e))?;
                tracing::info!(driver = driver.ident(), "Opened input device");
                self.input = Some(input);
                self.ownership = Some(InputOwnership::Separate);
                self.transition(PipelineState::InputSeparateConstructed);
            }
        }

        self.transition(PipelineState::Ready);
        Ok(())
    }

    /// Release the video device, and the input device if it is separate.
    ///
    /// Safe after any init outcome, and a no-op when called again.
    pub fn uninit(&mut self) {
        if let Some(mut video) = self.video.take() {
            video.shutdown();
        }

        if let Some(mut input) = self.input.take() {
            match self.ownership {
                Some(InputOwnership::Separate) => input.shutdown(),
                // Released by the video device.
                Some(InputOwnership::Bundled) | None => {}
            }
        }

        self.ownership = None;
        self.video_driver = None;
        self.input_driver = None;
        self.geometry = None;
        self.filter = VideoFilter::None;
        if self.state != PipelineState::Uninitialized {
            self.transition(PipelineState::Uninitialized);
        }
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?next, "Video pipeline state");
        self.state = next;
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Whether both devices are usable.
    pub fn is_ready(&self) -> bool {
        self.state == PipelineState::Ready
    }

    /// Geometry requested from the video driver.
    pub fn geometry(&self) -> Option<RenderGeometry> {
        self.geometry
    }

    /// Active post-processing filter.
    pub fn filter(&self) -> VideoFilter {
        self.filter
    }

    /// Internal upscale factor passed to the video driver.
    pub fn upscale(&self) -> u32 {
        self.filter.upscale()
    }

    /// Who owns the input device.
    pub fn ownership(&self) -> Option<InputOwnership> {
        self.ownership
    }

    /// Identifier of the selected video driver.
    pub fn video_ident(&self) -> Option<&str> {
        self.video_driver.as_ref().map(|d| d.ident())
    }

    /// Identifier of the selected input driver.
    pub fn input_ident(&self) -> Option<&str> {
        self.input_driver.as_ref().map(|d| d.ident())
    }

    /// The video device.
    pub fn video_mut(&mut self) -> Option<&mut (dyn VideoDevice + 'static)> {
        self.video.as_deref_mut()
    }

    /// The input device.
    pub fn input_mut(&mut self) -> Option<&mut (dyn InputDevice + 'static)> {
        self.input.as_deref_mut()
    }
}

impl std::fmt::Debug for VideoInputPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoInputPipeline")
            .field("state", &self.state)
            .field("video", &self.video_ident())
            .field("input", &self.input_ident())
            .field("ownership", &self.ownership)
            .field("geometry", &self.geometry)
            .field("filter", &self.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_drivers_are_separate() {
        let registry = BackendRegistry::builtin();
        let mut video = VideoInputPipeline::new();
        video.init(&registry, &Settings::default()).unwrap();

        assert!(video.is_ready());
        assert_eq!(video.ownership(), Some(InputOwnership::Separate));
        assert_eq!(video.video_ident(), Some("null"));
        assert_eq!(video.input_ident(), Some("null"));
        assert!(video.video_mut().unwrap().alive());

        video.uninit();
        assert_eq!(video.state(), PipelineState::Uninitialized);
        assert!(video.video_mut().is_none());
        assert!(video.input_mut().is_none());
    }

    #[test]
    fn test_scenario_geometry_and_upscale() {
        let registry = BackendRegistry::builtin();
        let mut settings = Settings::default();
        settings.video.fullscreen = false;
        settings.video.xscale = 2.0;
        settings.video.yscale = 2.0;
        settings.video.filter = "HQ2X".into();

        let mut video = VideoInputPipeline::new();
        video.init(&registry, &settings).unwrap();

        assert_eq!(
            video.geometry(),
            Some(RenderGeometry {
                width: 592,
                height: 448
            })
        );
        assert_eq!(video.upscale(), 4);
    }

    #[test]
    fn test_unknown_video_driver() {
        let registry = BackendRegistry::builtin();
        let mut settings = Settings::default();
        settings.video.driver = "gl".into();

        let mut video = VideoInputPipeline::new();
        let err = video.init(&registry, &settings).unwrap_err();
        assert_eq!(err.available_backends(), Some(&["null".to_string()][..]));
        assert_eq!(video.state(), PipelineState::Uninitialized);
    }

    #[test]
    fn test_unknown_input_driver() {
        let registry = BackendRegistry::builtin();
        let mut settings = Settings::default();
        settings.input.driver = "sdl".into();

        let mut video = VideoInputPipeline::new();
        assert!(matches!(
            video.init(&registry, &settings),
            Err(Error::BackendNotFound(_))
        ));
        assert!(video.video_mut().is_none());
    }

    #[test]
    fn test_uninit_twice() {
        let registry = BackendRegistry::builtin();
        let mut video = VideoInputPipeline::new();
        video.uninit();
        video.init(&registry, &Settings::default()).unwrap();
        video.uninit();
        video.uninit();
        assert_eq!(video.state(), PipelineState::Uninitialized);
    }
}
