//! Audio sample format conversion.
//!
//! The resampler works in 32-bit float. Devices that cannot take float
//! samples directly get signed 16-bit instead.

use crate::error::{Error, Result};

/// Sample format handed to the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// 32-bit float (-1.0 to 1.0)
    F32,
    /// Signed 16-bit
    S16,
}

impl SampleFormat {
    /// Get the number of bytes per sample.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::F32 => 4,
            SampleFormat::S16 => 2,
        }
    }

    /// Returns true if this format uses floating point.
    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::F32)
    }
}

/// Convert one float sample to signed 16-bit.
///
/// Scales by 32768 and saturates, so -1.0 maps to `i16::MIN` and 1.0 to
/// `i16::MAX`.
#[inline]
pub fn f32_to_s16_sample(value: f32) -> i16 {
    let scaled = (value * 32768.0) as i32;
    scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Convert one signed 16-bit sample to float.
#[inline]
pub fn s16_to_f32_sample(value: i16) -> f32 {
    value as f32 / 32768.0
}

/// Convert float samples to signed 16-bit.
///
/// Returns the number of samples written.
pub fn f32_to_s16(input: &[f32], output: &mut [i16]) -> Result<usize> {
    if output.len() < input.len() {
        return Err(Error::Config(format!(
            "Output buffer too small: {} < {}",
            output.len(),
            input.len()
        )));
    }

    for (out, &sample) in output.iter_mut().zip(input) {
        *out = f32_to_s16_sample(sample);
    }
    Ok(input.len())
}

/// Convert signed 16-bit samples to float.
///
/// Returns the number of samples written.
pub fn s16_to_f32(input: &[i16], output: &mut [f32]) -> Result<usize> {
    if output.len() < input.len() {
        return Err(Error::Config(format!(
            "Output buffer too small: {} < {}",
            output.len(),
            input.len()
        )));
    }

    for (out, &sample) in output.iter_mut().zip(input) {
        *out = s16_to_f32_sample(sample);
    }
    Ok(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_to_s16_range() {
        assert_eq!(f32_to_s16_sample(0.0), 0);
        assert_eq!(f32_to_s16_sample(0.5), 16384);
        assert_eq!(f32_to_s16_sample(-0.5), -16384);
        assert_eq!(f32_to_s16_sample(1.0), i16::MAX);
        assert_eq!(f32_to_s16_sample(-1.0), i16::MIN);
    }

    #[test]
    fn test_f32_to_s16_clamps() {
        assert_eq!(f32_to_s16_sample(4.0), i16::MAX);
        assert_eq!(f32_to_s16_sample(-4.0), i16::MIN);
        assert_eq!(f32_to_s16_sample(f32::NAN), 0);
    }

    #[test]
    fn test_s16_to_f32() {
        let input = [0i16, 16384, -16384, i16::MIN];
        let mut output = [0.0f32; 4];
        assert_eq!(s16_to_f32(&input, &mut output).unwrap(), 4);
        assert_eq!(output, [0.0, 0.5, -0.5, -1.0]);
    }

    #[test]
    fn test_slice_conversion() {
        let input = [0.25f32, -0.25, 2.0];
        let mut output = [0i16; 4];
        assert_eq!(f32_to_s16(&input, &mut output).unwrap(), 3);
        assert_eq!(&output[..3], &[8192, -8192, i16::MAX]);
        assert_eq!(output[3], 0);
    }

    #[test]
    fn test_output_too_small() {
        let input = [0.0f32; 8];
        let mut output = [0i16; 4];
        assert!(matches!(f32_to_s16(&input, &mut output), Err(Error::Config(_))));
    }

    #[test]
    fn test_sample_format() {
        assert_eq!(SampleFormat::F32.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::S16.bytes_per_sample(), 2);
        assert!(SampleFormat::F32.is_float());
        assert!(!SampleFormat::S16.is_float());
    }
}
