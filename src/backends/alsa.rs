//! ALSA audio playback.
//!
//! ALSA (Advanced Linux Sound Architecture) provides direct access to audio
//! hardware. The device string is passed to ALSA unchanged ("hw:0,0",
//! "plughw:1", ...); when empty, "default" is opened.
//!
//! The device is configured for interleaved stereo, preferring 32-bit float
//! samples and falling back to signed 16-bit when the hardware refuses.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};

use crate::backend::{AudioDevice, AudioDriver, AudioParams, BackendError, Samples};
use crate::registry::Capabilities;

const CHANNELS: u32 = 2;

/// Check if ALSA playback is available on this system.
pub fn is_available() -> bool {
    PCM::new("default", Direction::Playback, false).is_ok()
}

/// Audio driver backed by ALSA.
#[derive(Debug, Default)]
pub struct AlsaAudioDriver;

impl AlsaAudioDriver {
    /// Create a new AlsaAudioDriver.
    pub fn new() -> Self {
        Self
    }
}

impl AudioDriver for AlsaAudioDriver {
    fn ident(&self) -> &str {
        "alsa"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            float_samples: true,
            nonblocking: true,
            bundled_input: false,
        }
    }

    fn init(&self, params: &AudioParams<'_>) -> Result<Box<dyn AudioDevice>, BackendError> {
        let device = AlsaAudioDevice::open(params.device.unwrap_or("default"), params)?;
        Ok(Box::new(device))
    }
}

/// ALSA playback device.
pub struct AlsaAudioDevice {
    /// PCM device.
    pcm: PCM,
    /// Device accepts float samples.
    float: bool,
    /// Only write what fits without waiting.
    nonblock: bool,
}

fn map_open_error(device: &str, e: alsa::Error) -> BackendError {
    if e.errno() == libc::ENOENT {
        BackendError::NotFound(device.to_string())
    } else if e.errno() == libc::EACCES {
        BackendError::PermissionDenied(device.to_string())
    } else if e.errno() == libc::EBUSY {
        BackendError::Busy(device.to_string())
    } else {
        BackendError::Alsa(e.to_string())
    }
}

fn alsa_err(e: alsa::Error) -> BackendError {
    BackendError::Alsa(e.to_string())
}

impl AlsaAudioDevice {
    /// Open and configure a playback device.
    pub fn open(device: &str, params: &AudioParams<'_>) -> Result<Self, BackendError> {
        let pcm =
            PCM::new(device, Direction::Playback, false).map_err(|e| map_open_error(device, e))?;

        let buffer_frames = (params.rate as i64 * params.latency_ms as i64 / 1000).max(64);
        let period_frames = (buffer_frames / 4).max(16);

        // Configure hardware parameters
        let float = {
            let hwp = HwParams::any(&pcm).map_err(alsa_err)?;

            hwp.set_access(Access::RWInterleaved).map_err(alsa_err)?;

            let float = hwp.set_format(Format::float()).is_ok();
            if !float {
                hwp.set_format(Format::s16()).map_err(alsa_err)?;
            }

            hwp.set_channels(CHANNELS).map_err(alsa_err)?;
            hwp.set_rate(params.rate, ValueOr::Nearest).map_err(alsa_err)?;
            hwp.set_buffer_size(buffer_frames).map_err(alsa_err)?;
            hwp.set_period_size(period_frames, ValueOr::Nearest).map_err(alsa_err)?;

            pcm.hw_params(&hwp).map_err(alsa_err)?;
            float
        };

        pcm.prepare().map_err(alsa_err)?;

        tracing::info!(
            device,
            rate = params.rate,
            buffer_frames,
            float,
            "Opened ALSA playback device"
        );

        Ok(Self {
            pcm,
            float,
            nonblock: false,
        })
    }

    /// Frames that can be written without blocking.
    fn writable_frames(&self, frames: usize) -> Result<usize, BackendError> {
        if !self.nonblock {
            return Ok(frames);
        }
        match self.pcm.avail_update() {
            Ok(avail) => Ok(frames.min(avail.max(0) as usize)),
            Err(e) if e.errno() == libc::EPIPE => {
                self.pcm.prepare().map_err(alsa_err)?;
                Ok(frames)
            }
            Err(e) => Err(alsa_err(e)),
        }
    }

    fn recover_underrun<T>(&self, result: alsa::Result<T>) -> Result<Option<T>, BackendError> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.errno() == libc::EPIPE => {
                tracing::warn!("ALSA: buffer underrun");
                self.pcm.prepare().map_err(alsa_err)?;
                Ok(None)
            }
            Err(e) => Err(alsa_err(e)),
        }
    }
}

impl AudioDevice for AlsaAudioDevice {
    fn write(&mut self, samples: Samples<'_>) -> Result<usize, BackendError> {
        let frames = self.writable_frames(samples.len() / CHANNELS as usize)?;
        if frames == 0 {
            return Ok(0);
        }
        let len = frames * CHANNELS as usize;

        let written = match samples {
            Samples::F32(s) if self.float => {
                let io = self.pcm.io_f32().map_err(alsa_err)?;
                self.recover_underrun(io.writei(&s[..len]))?
            }
            Samples::F32(s) => {
                let converted: Vec<i16> = s[..len]
                    .iter()
                    .map(|&v| crate::audio::convert::f32_to_s16_sample(v))
                    .collect();
                let io = self.pcm.io_i16().map_err(alsa_err)?;
                self.recover_underrun(io.writei(&converted))?
            }
            Samples::S16(s) => {
                let io = self.pcm.io_i16().map_err(alsa_err)?;
                self.recover_underrun(io.writei(&s[..len]))?
            }
        };

        Ok(written.unwrap_or(0) * CHANNELS as usize)
    }

    fn set_nonblock_state(&mut self, nonblock: bool) {
        self.nonblock = nonblock;
    }

    fn use_float(&self) -> bool {
        self.float
    }

    fn stop(&mut self) -> bool {
        self.pcm.pause(true).is_ok()
    }

    fn start(&mut self) -> bool {
        self.pcm.pause(false).is_ok()
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.pcm.drain() {
            tracing::debug!("ALSA: drain on shutdown failed: {}", e);
        }
    }
}
