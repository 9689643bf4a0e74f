//! Raw PCM file output.
//!
//! The `file` audio driver writes interleaved signed 16-bit little-endian
//! stereo samples to the path given as the audio device string. The output
//! has no header; play it back with e.g. `aplay -f S16_LE -c 2 -r <rate>`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::audio::convert::f32_to_s16_sample;
use crate::backend::{AudioDevice, AudioDriver, AudioParams, BackendError, Samples};
use crate::registry::Capabilities;

/// Audio driver that writes raw PCM to a file.
#[derive(Debug, Default)]
pub struct FileAudioDriver;

impl FileAudioDriver {
    /// Create a new FileAudioDriver.
    pub fn new() -> Self {
        Self
    }
}

impl AudioDriver for FileAudioDriver {
    fn ident(&self) -> &str {
        "file"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            float_samples: false,
            nonblocking: true,
            bundled_input: false,
        }
    }

    fn init(&self, params: &AudioParams<'_>) -> Result<Box<dyn AudioDevice>, BackendError> {
        let path = params
            .device
            .ok_or_else(|| BackendError::NotFound("file driver needs an output path".into()))?;
        let device = FileAudioDevice::create(path, params.rate)?;
        tracing::info!(path = %device.path().display(), rate = params.rate, "Opened PCM file");
        Ok(Box::new(device))
    }
}

/// Audio device backed by a raw PCM file.
#[derive(Debug)]
pub struct FileAudioDevice {
    path: PathBuf,
    rate: u32,
    writer: Option<BufWriter<File>>,
    bytes_written: u64,
}

impl FileAudioDevice {
    /// Create the output file.
    pub fn create<P: AsRef<Path>>(path: P, rate: u32) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            rate,
            writer: Some(BufWriter::new(file)),
            bytes_written: 0,
        })
    }

    /// Get the path being written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sample rate of the written stream.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Get the total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, BackendError> {
        self.writer
            .as_mut()
            .ok_or_else(|| BackendError::Other(format!("{} is closed", self.path.display())))
    }
}

impl AudioDevice for FileAudioDevice {
    fn write(&mut self, samples: Samples<'_>) -> Result<usize, BackendError> {
        let count = samples.len();
        let writer = self.writer()?;
        match samples {
            Samples::S16(s) => {
                for sample in s {
                    writer.write_all(&sample.to_le_bytes())?;
                }
            }
            Samples::F32(s) => {
                for &sample in s {
                    writer.write_all(&f32_to_s16_sample(sample).to_le_bytes())?;
                }
            }
        }
        self.bytes_written += count as u64 * 2;
        Ok(count)
    }

    // Writes never block on a file.
    fn set_nonblock_state(&mut self, _nonblock: bool) {}

    fn shutdown(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                tracing::warn!(path = %self.path.display(), "Failed to flush PCM file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_s16_le() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.pcm");
        let path_str = path.to_str().unwrap();

        let params = AudioParams {
            device: Some(path_str),
            rate: 44100,
            latency_ms: 64,
        };
        let mut device = FileAudioDriver::new().init(&params).unwrap();
        assert!(!device.use_float());
        assert_eq!(device.write(Samples::S16(&[1, -2])).unwrap(), 2);
        assert_eq!(device.write(Samples::F32(&[1.0, -1.0])).unwrap(), 2);
        device.shutdown();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 1);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), -2);
        assert_eq!(i16::from_le_bytes([bytes[4], bytes[5]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([bytes[6], bytes[7]]), i16::MIN);
    }

    #[test]
    fn test_requires_path() {
        let params = AudioParams {
            device: None,
            rate: 48000,
            latency_ms: 64,
        };
        let result = FileAudioDriver::new().init(&params);
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[test]
    fn test_write_after_shutdown_fails() {
        let dir = tempdir().unwrap();
        let mut device = FileAudioDevice::create(dir.path().join("a.pcm"), 48000).unwrap();
        device.shutdown();
        assert!(device.write(Samples::S16(&[0, 0])).is_err());
    }
}
