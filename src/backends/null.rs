//! Null backends that accept everything and output nothing.
//!
//! Useful for:
//! - Running a core headless
//! - Testing the pipelines without hardware
//! - Benchmarking the core without device latency

use crate::backend::{
    AudioDevice, AudioDriver, AudioParams, BackendError, InputDevice, InputDriver, Samples,
    VideoDevice, VideoDriver, VideoInfo, VideoInit,
};
use crate::registry::Capabilities;

/// Audio driver whose devices discard all samples.
#[derive(Debug, Default)]
pub struct NullAudioDriver;

impl NullAudioDriver {
    /// Create a new NullAudioDriver.
    pub fn new() -> Self {
        Self
    }
}

impl AudioDriver for NullAudioDriver {
    fn ident(&self) -> &str {
        "null"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            float_samples: true,
            nonblocking: true,
            bundled_input: false,
        }
    }

    fn init(&self, params: &AudioParams<'_>) -> Result<Box<dyn AudioDevice>, BackendError> {
        Ok(Box::new(NullAudioDevice {
            rate: params.rate,
            nonblock: false,
            written: 0,
        }))
    }
}

/// Audio device that discards all samples.
#[derive(Debug)]
pub struct NullAudioDevice {
    rate: u32,
    nonblock: bool,
    written: u64,
}

impl NullAudioDevice {
    /// Output rate the device was opened with.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Whether non-blocking mode was requested.
    pub fn is_nonblocking(&self) -> bool {
        self.nonblock
    }

    /// Total number of samples discarded.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl AudioDevice for NullAudioDevice {
    fn write(&mut self, samples: Samples<'_>) -> Result<usize, BackendError> {
        self.written += samples.len() as u64;
        Ok(samples.len())
    }

    fn set_nonblock_state(&mut self, nonblock: bool) {
        self.nonblock = nonblock;
    }

    fn use_float(&self) -> bool {
        true
    }

    fn shutdown(&mut self) {}
}

/// Video driver whose devices discard all frames.
#[derive(Debug, Default)]
pub struct NullVideoDriver;

impl NullVideoDriver {
    /// Create a new NullVideoDriver.
    pub fn new() -> Self {
        Self
    }
}

impl VideoDriver for NullVideoDriver {
    fn ident(&self) -> &str {
        "null"
    }

    fn init(&self, info: &VideoInfo) -> Result<VideoInit, BackendError> {
        Ok(VideoInit::video_only(Box::new(NullVideoDevice {
            info: *info,
            frames: 0,
            alive: true,
        })))
    }
}

/// Video device that discards all frames.
#[derive(Debug)]
pub struct NullVideoDevice {
    info: VideoInfo,
    frames: u64,
    alive: bool,
}

impl NullVideoDevice {
    /// Parameters the device was opened with.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Number of frames presented.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl VideoDevice for NullVideoDevice {
    fn frame(&mut self, _data: &[u16], _width: u32, _height: u32, _pitch: u32) -> bool {
        self.frames += 1;
        self.alive
    }

    fn set_nonblock_state(&mut self, _nonblock: bool) {}

    fn alive(&self) -> bool {
        self.alive
    }

    fn focus(&self) -> bool {
        true
    }

    fn shutdown(&mut self) {
        self.alive = false;
    }
}

/// Input driver whose devices report nothing pressed.
#[derive(Debug, Default)]
pub struct NullInputDriver;

impl NullInputDriver {
    /// Create a new NullInputDriver.
    pub fn new() -> Self {
        Self
    }
}

impl InputDriver for NullInputDriver {
    fn ident(&self) -> &str {
        "null"
    }

    fn init(&self) -> Result<Box<dyn InputDevice>, BackendError> {
        Ok(Box::new(NullInputDevice { polls: 0 }))
    }
}

/// Input device that reports nothing pressed.
#[derive(Debug)]
pub struct NullInputDevice {
    polls: u64,
}

impl NullInputDevice {
    /// Number of times the device was polled.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputDevice for NullInputDevice {
    fn poll(&mut self) {
        self.polls += 1;
    }

    fn state(&self, _port: u32, _id: u32) -> i16 {
        0
    }

    fn shutdown(&mut self) {}
}
