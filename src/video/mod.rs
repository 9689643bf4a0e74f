//! Video and input pipeline.

mod geometry;
mod pipeline;

pub use geometry::{BASE_HEIGHT, BASE_WIDTH, RenderGeometry, VideoFilter};
pub use pipeline::{InputOwnership, PipelineState, VideoInputPipeline};
