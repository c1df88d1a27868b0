pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod storage;
pub mod transport;
pub mod update;
pub mod vision;

pub use audio::{AudioPipeline, PcmBuffer};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::PipelineError;
pub use fetch::{FileFetch, HttpFileFetcher};
pub use storage::{MediaKind, StorageLocator, UserLocks};
pub use transport::{RemoteFiles, TelegramClient};
pub use update::{PhotoSize, Update};
pub use vision::{CascadeDetector, FaceDetector, FacePipeline, FaceRegion, PhotoOutcome};
