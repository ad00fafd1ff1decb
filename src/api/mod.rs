//! Contains the types for the high level viewer pipeline.

mod map_method;
mod viewer_pipeline;

pub use map_method::{MapMethod, ViewMode};
pub use viewer_pipeline::ViewerPipeline;
