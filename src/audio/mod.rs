//! Audio output pipeline.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`pipeline`] | Driver selection, chunk sizing, init and teardown |
//! | [`buffers`] | Fixed-capacity raw, resampled and converted buffers |
//! | [`resampler`] | Sample rate conversion |
//! | [`convert`] | Float to signed 16-bit conversion |

pub mod buffers;
pub mod convert;
pub mod pipeline;
pub mod resampler;

pub use buffers::{AudioBuffers, CHANNELS};
pub use convert::SampleFormat;
pub use pipeline::{
    AudioPipeline, AudioStages, BLOCK_CHUNK_SIZE, MAX_RATIO, NONBLOCK_CHUNK_SIZE,
    validate_rate_ratio,
};
pub use resampler::{
    InterpolatingResampler, Resampler, ResamplerFactory, ResamplerQuality, max_output_frames,
    new_resampler,
};
