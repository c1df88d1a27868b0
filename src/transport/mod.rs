pub mod telegram;

pub use telegram::{Chat, Message, TelegramClient, TelegramUpdate, User, Voice};

use crate::error::PipelineError;

/// Remote file access provided by the chat transport.
///
/// `file_path` resolves a file reference to a downloadable path on the
/// file-hosting endpoint; `download` is the transport's own trusted download
/// primitive, used for voice notes.
#[async_trait::async_trait]
pub trait RemoteFiles: Send + Sync {
    async fn file_path(&self, file_id: &str) -> Result<String, PipelineError>;

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, PipelineError>;
}
