//! Fixed-capacity audio buffers.
//!
//! Three buffers are allocated once at init and never resized:
//!
//! | Buffer | Samples | Capacity (frames) |
//! |--------|---------|-------------------|
//! | raw | f32 | max chunk |
//! | resampled | f32 | max chunk × max ratio |
//! | converted | i16 | max chunk × max ratio |
//!
//! The host writes emulated samples into `raw` at the `data_ptr` cursor,
//! resamples a full chunk into `resampled`, and, if the device cannot take
//! float samples, converts into `converted`. Only slices are handed out, so
//! the storage keeps a stable address for the whole session.

use super::convert::f32_to_s16;
use super::resampler::Resampler;
use crate::error::{Error, Result};

/// Interleaved channel count of every audio buffer.
pub const CHANNELS: usize = 2;

/// The raw, resampled and converted sample buffers.
pub struct AudioBuffers {
    raw: Vec<f32>,
    /// Write cursor into `raw`, in samples.
    data_ptr: usize,
    resampled: Vec<f32>,
    converted: Vec<i16>,
}

fn try_alloc<T: Copy + Default>(samples: usize, what: &str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(samples).map_err(|e| {
        Error::AllocationFailed(format!("{} buffer of {} samples: {}", what, samples, e))
    })?;
    buf.resize(samples, T::default());
    Ok(buf)
}

impl AudioBuffers {
    /// Allocate buffers for chunks of up to `max_chunk_frames` frames,
    /// resampled at ratios below `max_ratio`.
    pub fn allocate(max_chunk_frames: usize, max_ratio: usize) -> Result<Self> {
        let overflow = || {
            Error::AllocationFailed(format!(
                "buffer size overflows: {} frames x {}",
                max_chunk_frames, max_ratio
            ))
        };

        let raw_samples = max_chunk_frames.checked_mul(CHANNELS).ok_or_else(overflow)?;
        let out_samples = raw_samples.checked_mul(max_ratio).ok_or_else(overflow)?;

        let buffers = Self {
            raw: try_alloc(raw_samples, "raw")?,
            data_ptr: 0,
            resampled: try_alloc(out_samples, "resampled")?,
            converted: try_alloc(out_samples, "converted")?,
        };

        tracing::debug!(
            raw_frames = max_chunk_frames,
            out_frames = out_samples / CHANNELS,
            "Allocated audio buffers"
        );

        Ok(buffers)
    }

    /// Capacity of the raw buffer in frames.
    pub fn raw_capacity(&self) -> usize {
        self.raw.len() / CHANNELS
    }

    /// Capacity of the resampled buffer in frames.
    pub fn resampled_capacity(&self) -> usize {
        self.resampled.len() / CHANNELS
    }

    /// Capacity of the converted buffer in frames.
    pub fn converted_capacity(&self) -> usize {
        self.converted.len() / CHANNELS
    }

    /// Write cursor into the raw buffer, in samples.
    pub fn data_ptr(&self) -> usize {
        self.data_ptr
    }

    /// Frames currently buffered in the raw buffer.
    pub fn buffered_frames(&self) -> usize {
        self.data_ptr / CHANNELS
    }

    /// Append interleaved samples at the write cursor.
    ///
    /// Only whole frames are written. Returns the number of frames accepted,
    /// which is less than offered once the raw buffer is full.
    pub fn write_frames(&mut self, samples: &[f32]) -> usize {
        let free = self.raw.len() - self.data_ptr;
        let len = (samples.len().min(free) / CHANNELS) * CHANNELS;
        self.raw[self.data_ptr..self.data_ptr + len].copy_from_slice(&samples[..len]);
        self.data_ptr += len;
        len / CHANNELS
    }

    /// True once at least `chunk_size` frames are buffered.
    pub fn is_chunk_full(&self, chunk_size: usize) -> bool {
        self.buffered_frames() >= chunk_size
    }

    /// Buffered raw samples.
    pub fn raw(&self) -> &[f32] {
        &self.raw[..self.data_ptr]
    }

    /// Reset the write cursor, discarding buffered samples.
    pub fn clear(&mut self) {
        self.data_ptr = 0;
    }

    /// Resample everything buffered into the resampled buffer and reset the
    /// write cursor. Returns the number of output frames.
    pub fn resample_chunk(&mut self, resampler: &mut dyn Resampler, ratio: f64) -> Result<usize> {
        let frames = resampler.process(&self.raw[..self.data_ptr], &mut self.resampled, ratio)?;
        self.data_ptr = 0;
        Ok(frames)
    }

    /// The whole resampled buffer.
    pub fn resampled(&self) -> &[f32] {
        &self.resampled
    }

    /// The whole resampled buffer, mutably.
    pub fn resampled_mut(&mut self) -> &mut [f32] {
        &mut self.resampled
    }

    /// Convert the first `frames` resampled frames to signed 16-bit and
    /// return them.
    pub fn convert_to_s16(&mut self, frames: usize) -> Result<&[i16]> {
        let samples = frames * CHANNELS;
        if samples > self.resampled.len() {
            return Err(Error::Config(format!(
                "{} frames exceed resampled capacity {}",
                frames,
                self.resampled_capacity()
            )));
        }
        let written = f32_to_s16(&self.resampled[..samples], &mut self.converted)?;
        Ok(&self.converted[..written])
    }

    /// The whole converted buffer.
    pub fn converted(&self) -> &[i16] {
        &self.converted
    }
}

impl std::fmt::Debug for AudioBuffers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBuffers")
            .field("raw_frames", &self.raw_capacity())
            .field("data_ptr", &self.data_ptr)
            .field("resampled_frames", &self.resampled_capacity())
            .field("converted_frames", &self.converted_capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::resampler::{ResamplerQuality, new_resampler};

    #[test]
    fn test_capacities() {
        let buffers = AudioBuffers::allocate(2048, 16).unwrap();
        assert_eq!(buffers.raw_capacity(), 2048);
        assert_eq!(buffers.resampled_capacity(), 2048 * 16);
        assert_eq!(buffers.converted_capacity(), 2048 * 16);
        assert_eq!(buffers.data_ptr(), 0);
    }

    #[test]
    fn test_overflow_is_allocation_failure() {
        let result = AudioBuffers::allocate(usize::MAX / 2, 16);
        assert!(matches!(result, Err(Error::AllocationFailed(_))));
    }

    #[test]
    fn test_write_frames_stops_at_capacity() {
        let mut buffers = AudioBuffers::allocate(4, 2).unwrap();
        assert_eq!(buffers.write_frames(&[0.1; 6]), 3);
        assert_eq!(buffers.data_ptr(), 6);
        assert!(!buffers.is_chunk_full(4));

        assert_eq!(buffers.write_frames(&[0.2; 6]), 1);
        assert!(buffers.is_chunk_full(4));
        assert_eq!(buffers.write_frames(&[0.3; 2]), 0);
        assert_eq!(buffers.raw().len(), 8);
    }

    #[test]
    fn test_partial_frame_not_written() {
        let mut buffers = AudioBuffers::allocate(4, 2).unwrap();
        assert_eq!(buffers.write_frames(&[0.1; 3]), 1);
        assert_eq!(buffers.data_ptr(), 2);
    }

    #[test]
    fn test_resample_and_convert() {
        let mut buffers = AudioBuffers::allocate(64, 16).unwrap();
        let mut resampler = new_resampler(ResamplerQuality::Fast, CHANNELS).unwrap();

        buffers.write_frames(&[0.0; 128]);
        let frames = buffers.resample_chunk(resampler.as_mut(), 2.0).unwrap();
        assert_eq!(buffers.data_ptr(), 0);
        assert!(frames > 0 && frames <= buffers.resampled_capacity());

        buffers.resampled_mut()[0] = 0.5;
        let converted = buffers.convert_to_s16(frames).unwrap();
        assert_eq!(converted.len(), frames * CHANNELS);
        assert_eq!(converted[0], 16384);
    }

    #[test]
    fn test_convert_beyond_capacity_fails() {
        let mut buffers = AudioBuffers::allocate(4, 2).unwrap();
        assert!(buffers.convert_to_s16(9).is_err());
    }
}
