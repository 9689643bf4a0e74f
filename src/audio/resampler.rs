//! Audio sample rate conversion (resampling).
//!
//! The pipeline only sees the [`Resampler`] trait: convert N interleaved
//! input frames at ratio R (output rate / input rate) into about N × R
//! output frames. The ratio is passed per call so a host can nudge it for
//! dynamic rate control.
//!
//! The built-in implementation interpolates between neighbouring frames and
//! keeps a short history across calls, so consecutive chunks join without
//! discontinuities.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Resampling quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerQuality {
    /// Linear interpolation - fast but lower quality.
    Fast,
    /// Cubic interpolation - good balance of speed and quality.
    #[default]
    Medium,
}

/// Opaque sample rate converter.
pub trait Resampler: Send {
    /// Resample interleaved `input` into `output` at `ratio`
    /// (output rate / input rate).
    ///
    /// Returns the number of output frames written. `output` must hold at
    /// least [`max_output_frames`] frames.
    fn process(&mut self, input: &[f32], output: &mut [f32], ratio: f64) -> Result<usize>;

    /// Number of interleaved channels.
    fn channels(&self) -> usize;

    /// Quality this resampler was built with.
    fn quality(&self) -> ResamplerQuality;

    /// Clear the history so the next call starts a new stream.
    fn reset(&mut self);
}

/// Constructor used by the audio pipeline to build its resampler.
pub type ResamplerFactory = fn(ResamplerQuality, usize) -> Result<Box<dyn Resampler>>;

/// Build the built-in resampler.
pub fn new_resampler(quality: ResamplerQuality, channels: usize) -> Result<Box<dyn Resampler>> {
    Ok(Box::new(InterpolatingResampler::new(quality, channels)?))
}

/// Upper bound on output frames for `input_frames` at `ratio`.
pub fn max_output_frames(input_frames: usize, ratio: f64) -> usize {
    (input_frames as f64 * ratio).ceil() as usize
}

/// Frames of history kept between calls.
const HISTORY_FRAMES: usize = 3;

/// Linear or cubic interpolating resampler.
pub struct InterpolatingResampler {
    quality: ResamplerQuality,
    channels: usize,
    /// Fractional read position carried over to the next call.
    phase: f64,
    /// Last frames of the previous call, interleaved.
    history: Vec<f32>,
    /// Scratch: history followed by the current input.
    extended: Vec<f32>,
}

impl InterpolatingResampler {
    /// Create a new resampler.
    pub fn new(quality: ResamplerQuality, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(Error::Config("Channels must be non-zero".into()));
        }

        Ok(Self {
            quality,
            channels,
            phase: 0.0,
            history: vec![0.0; HISTORY_FRAMES * channels],
            extended: Vec::new(),
        })
    }
}

impl Resampler for InterpolatingResampler {
    fn process(&mut self, input: &[f32], output: &mut [f32], ratio: f64) -> Result<usize> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(Error::Config(format!("Invalid resampling ratio {}", ratio)));
        }

        let channels = self.channels;
        if input.len() % channels != 0 {
            return Err(Error::Config(format!(
                "Input size {} not aligned to {} channels",
                input.len(),
                channels
            )));
        }

        let input_frames = input.len() / channels;
        if input_frames == 0 {
            return Ok(0);
        }

        let capacity = output.len() / channels;
        let needed = max_output_frames(input_frames, ratio);
        if capacity < needed {
            return Err(Error::Config(format!(
                "Output buffer too small: {} < {} frames",
                capacity, needed
            )));
        }

        self.extended.clear();
        self.extended.extend_from_slice(&self.history);
        self.extended.extend_from_slice(input);
        let ext = &self.extended;
        let ext_frames = HISTORY_FRAMES + input_frames;

        // Interpolate between frames idx and idx + 1, with idx - 1 and
        // idx + 2 as control points; stop before the last frame is needed.
        let step = 1.0 / ratio;
        let mut pos = 1.0 + self.phase;
        let mut written = 0;

        while pos < (ext_frames - 2) as f64 && written < capacity {
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;

            for ch in 0..channels {
                let at = |frame: usize| ext[frame * channels + ch];
                let s1 = at(idx);
                let s2 = at(idx + 1);

                let value = match self.quality {
                    ResamplerQuality::Fast => s1 + frac * (s2 - s1),
                    ResamplerQuality::Medium => {
                        cubic_interpolate(at(idx - 1), s1, s2, at(idx + 2), frac).clamp(-1.0, 1.0)
                    }
                };
                output[written * channels + ch] = value;
            }

            written += 1;
            pos += step;
        }

        // Carry position and the last frames over to the next call. A loop
        // cut short by the output capacity leaves `pos` just below the end,
        // and the next call must still start at frame 1 or later.
        self.phase = (pos - input_frames as f64 - 1.0).max(0.0);
        let tail = (ext_frames - HISTORY_FRAMES) * channels;
        self.history.copy_from_slice(&ext[tail..]);

        Ok(written)
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn quality(&self) -> ResamplerQuality {
        self.quality
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.history.fill(0.0);
    }
}

impl std::fmt::Debug for InterpolatingResampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolatingResampler")
            .field("quality", &self.quality)
            .field("channels", &self.channels)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Catmull-Rom cubic interpolation.
///
/// Interpolates between s1 and s2 using s0 and s3 as control points.
/// t is the fractional position between s1 and s2 (0.0 to 1.0).
#[inline]
fn cubic_interpolate(s0: f32, s1: f32, s2: f32, s3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    // Catmull-Rom coefficients
    let a0 = -0.5 * s0 + 1.5 * s1 - 1.5 * s2 + 0.5 * s3;
    let a1 = s0 - 2.5 * s1 + 2.0 * s2 - 0.5 * s3;
    let a2 = -0.5 * s0 + 0.5 * s2;
    let a3 = s1;

    a0 * t3 + a1 * t2 + a2 * t + a3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_constant(frames: usize, value: f32) -> Vec<f32> {
        vec![value; frames * 2]
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(InterpolatingResampler::new(ResamplerQuality::Fast, 0).is_err());
    }

    #[test]
    fn test_same_rate_frame_count() {
        let mut resampler = new_resampler(ResamplerQuality::Medium, 2).unwrap();
        let input = stereo_constant(64, 0.25);
        let mut output = vec![0.0; 64 * 2];

        let frames = resampler.process(&input, &mut output, 1.0).unwrap();
        assert_eq!(frames, 64);
    }

    #[test]
    fn test_upsample_2x() {
        let mut resampler = new_resampler(ResamplerQuality::Fast, 2).unwrap();
        let input = stereo_constant(64, 0.0);
        let mut output = vec![0.0; max_output_frames(64, 2.0) * 2];

        let frames = resampler.process(&input, &mut output, 2.0).unwrap();
        assert!((126..=128).contains(&frames), "got {} frames", frames);
    }

    #[test]
    fn test_downsample_2x() {
        let mut resampler = new_resampler(ResamplerQuality::Medium, 2).unwrap();
        let input = stereo_constant(64, 0.0);
        let mut output = vec![0.0; 32 * 2];

        let frames = resampler.process(&input, &mut output, 0.5).unwrap();
        assert!((31..=32).contains(&frames), "got {} frames", frames);
    }

    #[test]
    fn test_frame_count_stays_on_ratio_across_calls() {
        let mut resampler = new_resampler(ResamplerQuality::Medium, 2).unwrap();
        let ratio = 48000.0 / 32040.0;
        let input = stereo_constant(64, 0.1);
        let mut output = vec![0.0; max_output_frames(64, ratio) * 2];

        let mut total = 0;
        for _ in 0..100 {
            total += resampler.process(&input, &mut output, ratio).unwrap();
        }

        let expected = 6400.0 * ratio;
        assert!(
            (total as f64 - expected).abs() < 2.0,
            "expected ~{}, got {}",
            expected,
            total
        );
    }

    #[test]
    fn test_constant_signal_preserved() {
        for quality in [ResamplerQuality::Fast, ResamplerQuality::Medium] {
            let mut resampler = new_resampler(quality, 2).unwrap();
            let input = stereo_constant(128, 0.5);
            let mut output = vec![0.0; max_output_frames(128, 1.5) * 2];

            // First call ramps in from the zeroed history.
            resampler.process(&input, &mut output, 1.5).unwrap();
            let frames = resampler.process(&input, &mut output, 1.5).unwrap();

            for &sample in &output[..frames * 2] {
                assert!((sample - 0.5).abs() < 1e-5, "{:?}: {}", quality, sample);
            }
        }
    }

    #[test]
    fn test_exact_capacity_across_calls() {
        for quality in [ResamplerQuality::Fast, ResamplerQuality::Medium] {
            let mut resampler = new_resampler(quality, 2).unwrap();
            let input = stereo_constant(64, 0.25);
            let mut output = vec![0.0; max_output_frames(64, 1.5) * 2];

            for _ in 0..8 {
                let frames = resampler.process(&input, &mut output, 1.5).unwrap();
                assert!(frames <= max_output_frames(64, 1.5));
            }
        }
    }

    #[test]
    fn test_output_too_small() {
        let mut resampler = new_resampler(ResamplerQuality::Fast, 2).unwrap();
        let input = stereo_constant(64, 0.0);
        let mut output = vec![0.0; 64 * 2];
        assert!(resampler.process(&input, &mut output, 2.0).is_err());
    }

    #[test]
    fn test_misaligned_input() {
        let mut resampler = new_resampler(ResamplerQuality::Fast, 2).unwrap();
        let mut output = vec![0.0; 16];
        assert!(resampler.process(&[0.0; 3], &mut output, 1.0).is_err());
    }

    #[test]
    fn test_invalid_ratio() {
        let mut resampler = new_resampler(ResamplerQuality::Fast, 2).unwrap();
        let mut output = vec![0.0; 16];
        assert!(resampler.process(&[0.0; 4], &mut output, 0.0).is_err());
        assert!(resampler.process(&[0.0; 4], &mut output, f64::NAN).is_err());
    }

    #[test]
    fn test_cubic_interpolation() {
        // Test at boundaries
        let at_zero = cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.0);
        assert!((at_zero - 1.0).abs() < 0.01, "at t=0 should be s1=1.0, got {}", at_zero);

        let at_one = cubic_interpolate(0.0, 1.0, 2.0, 3.0, 1.0);
        assert!((at_one - 2.0).abs() < 0.01, "at t=1 should be s2=2.0, got {}", at_one);

        // Linear data stays linear
        let mid = cubic_interpolate(0.0, 1.0, 2.0, 3.0, 0.5);
        assert!((mid - 1.5).abs() < 0.01, "midpoint should be 1.5, got {}", mid);
    }

    #[test]
    fn test_reset() {
        let mut resampler = InterpolatingResampler::new(ResamplerQuality::Fast, 1).unwrap();
        let mut output = vec![0.0; 8];
        resampler.process(&[0.5, 0.5, 0.5], &mut output, 0.7).unwrap();

        resampler.reset();
        assert_eq!(resampler.phase, 0.0);
        assert!(resampler.history.iter().all(|&x| x == 0.0));
    }
}
