pub mod decode;
pub mod pipeline;
pub mod resample;

pub use decode::PcmBuffer;
pub use pipeline::AudioPipeline;
