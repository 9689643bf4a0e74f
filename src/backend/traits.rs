//! Backend traits.

use super::BackendError;
use crate::registry::Capabilities;

/// Parameters handed to an audio driver when constructing its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioParams<'a> {
    /// Device string, `None` selects the backend's default device.
    pub device: Option<&'a str>,
    /// Output sample rate in Hz.
    pub rate: u32,
    /// Target latency in milliseconds.
    pub latency_ms: u32,
}

/// Interleaved stereo samples handed to an audio device.
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    /// Floating point samples in -1.0..=1.0, used when the device reports
    /// [`AudioDevice::use_float`].
    F32(&'a [f32]),
    /// Signed 16-bit samples.
    S16(&'a [i16]),
}

impl Samples<'_> {
    /// Number of individual samples (not frames).
    pub fn len(&self) -> usize {
        match self {
            Samples::F32(s) => s.len(),
            Samples::S16(s) => s.len(),
        }
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Factory for audio output devices.
pub trait AudioDriver: Send + Sync {
    /// Identifier used to select this driver from configuration.
    fn ident(&self) -> &str;

    /// Optional capabilities advertised by this driver.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Open an output device.
    fn init(&self, params: &AudioParams<'_>) -> Result<Box<dyn AudioDevice>, BackendError>;
}

/// A constructed audio output device.
pub trait AudioDevice: Send {
    /// Write interleaved stereo samples, returning the number of samples
    /// accepted. In non-blocking mode this may be less than offered.
    fn write(&mut self, samples: Samples<'_>) -> Result<usize, BackendError>;

    /// Switch between blocking and non-blocking writes.
    fn set_nonblock_state(&mut self, nonblock: bool);

    /// Whether the device accepts floating point samples directly.
    ///
    /// Only queried when the driver advertises
    /// [`Capabilities::float_samples`].
    fn use_float(&self) -> bool {
        false
    }

    /// Pause playback. Returns false if the device refused.
    fn stop(&mut self) -> bool {
        true
    }

    /// Resume playback. Returns false if the device refused.
    fn start(&mut self) -> bool {
        true
    }

    /// Release the device.
    fn shutdown(&mut self);
}

/// Parameters handed to a video driver when constructing its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// Window or mode width in pixels.
    pub width: u32,
    /// Window or mode height in pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Wait for vertical sync.
    pub vsync: bool,
    /// Keep the original aspect ratio when scaling.
    pub force_aspect: bool,
    /// Use bilinear filtering when scaling.
    pub smooth: bool,
    /// Upscale factor for the internal render target.
    pub input_scale: u32,
    /// Frames arrive in 32-bit color instead of 15-bit.
    pub rgb32: bool,
}

/// Result of constructing a video device.
pub struct VideoInit {
    /// The video device.
    pub video: Box<dyn VideoDevice>,
    /// Input device bundled with the video device, sharing its resources.
    ///
    /// A bundled input must never be shut down on its own; shutting down
    /// the video device releases it.
    pub input: Option<Box<dyn InputDevice>>,
}

impl VideoInit {
    /// Video device without a bundled input.
    pub fn video_only(video: Box<dyn VideoDevice>) -> Self {
        Self { video, input: None }
    }

    /// Video device that also provides input.
    pub fn with_input(video: Box<dyn VideoDevice>, input: Box<dyn InputDevice>) -> Self {
        Self {
            video,
            input: Some(input),
        }
    }
}

/// Factory for video output devices.
pub trait VideoDriver: Send + Sync {
    /// Identifier used to select this driver from configuration.
    fn ident(&self) -> &str;

    /// Optional capabilities advertised by this driver.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Open a video device, optionally bundling an input device.
    fn init(&self, info: &VideoInfo) -> Result<VideoInit, BackendError>;
}

/// A constructed video output device.
pub trait VideoDevice: Send {
    /// Present a frame of 16-bit pixels. `pitch` is in bytes.
    ///
    /// Returns false if the device can no longer present frames.
    fn frame(&mut self, data: &[u16], width: u32, height: u32, pitch: u32) -> bool;

    /// Switch vsync-style blocking on or off (fast-forward).
    fn set_nonblock_state(&mut self, nonblock: bool);

    /// False once the window has been closed.
    fn alive(&self) -> bool;

    /// Whether the window has input focus.
    fn focus(&self) -> bool;

    /// Release the device, including any bundled input.
    fn shutdown(&mut self);
}

/// Factory for input devices.
pub trait InputDriver: Send + Sync {
    /// Identifier used to select this driver from configuration.
    fn ident(&self) -> &str;

    /// Open an input device.
    fn init(&self) -> Result<Box<dyn InputDevice>, BackendError>;
}

/// A constructed input device.
pub trait InputDevice: Send {
    /// Refresh the input state.
    fn poll(&mut self);

    /// State of button or axis `id` on controller `port`.
    fn state(&self, port: u32, id: u32) -> i16;

    /// Release the device.
    fn shutdown(&mut self);
}
