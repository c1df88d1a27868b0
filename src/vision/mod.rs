pub mod detector;
pub mod pipeline;

pub use detector::{CascadeDetector, FaceDetector, FaceRegion};
pub use pipeline::{FacePipeline, PhotoOutcome};
