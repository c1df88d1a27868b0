use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub fetch: FetchConfig,
    pub detector: DetectorConfig,
}

#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    /// Base URL of the Bot API (overridable for tests / local API servers)
    pub api_base: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub audio_root: String,
    pub photo_root: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// Target sample rate for exported WAV artifacts
    pub sample_rate: u32,
}

#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    /// Upper bound on a single file download; expiry is a fetch failure
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Path to the SeetaFace cascade model file
    pub model_path: String,
    /// Scan scale factor between pyramid levels
    pub scale_factor: f64,
    /// Detection confidence vote threshold
    pub min_neighbors: u32,
    /// Minimum face region side length in pixels
    pub min_size: u32,
}

impl Config {
    /// Load configuration from an optional file, falling back to defaults.
    ///
    /// The bot token is deliberately not part of this struct; it is read
    /// once from the environment at startup.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("telegram.api_base", "https://api.telegram.org")?
            .set_default("telegram.poll_timeout_secs", 25i64)?
            .set_default("storage.audio_root", "./audio_messages")?
            .set_default("storage.photo_root", "./photos")?
            .set_default("audio.sample_rate", 16000i64)?
            .set_default("fetch.timeout_secs", 30i64)?
            .set_default("detector.model_path", "models/seeta_fd_frontal_v1.0.bin")?
            .set_default("detector.scale_factor", 1.1f64)?
            .set_default("detector.min_neighbors", 5i64)?
            .set_default("detector.min_size", 30i64)?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
