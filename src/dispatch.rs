use crate::audio::AudioPipeline;
use crate::error::PipelineError;
use crate::storage::UserLocks;
use crate::transport::RemoteFiles;
use crate::update::{PhotoSize, Update};
use crate::vision::{FacePipeline, PhotoOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub const GREETING: &str = "Hello! I'm a media keeper bot. Send me a voice note and I'll \
archive it as a 16 kHz WAV, or a photo and I'll keep it if I can spot a face.";
pub const VOICE_SAVED: &str = "Voice message saved successfully to WAV.";
pub const VOICE_ERROR: &str = "An error ocurred processing the voice note.";
pub const PHOTO_SAVED: &str = "Picture with detected faces saved successfully.";
pub const PHOTO_NO_FACES: &str = "No faces detected in this picture.";
pub const PHOTO_ERROR: &str = "An error ocurred processing the picture.";

/// Routes classified updates to the matching pipeline and turns every
/// outcome, success or failure, into at most one fixed reply string.
///
/// All pipeline errors stop here: they are logged with full detail and
/// mapped to a generic per-media-kind message, so one bad update can never
/// break the processing of the next.
pub struct Dispatcher {
    audio: AudioPipeline,
    photos: FacePipeline,
    files: Arc<dyn RemoteFiles>,
    locks: UserLocks,
}

impl Dispatcher {
    pub fn new(audio: AudioPipeline, photos: FacePipeline, files: Arc<dyn RemoteFiles>) -> Self {
        Self {
            audio,
            photos,
            files,
            locks: UserLocks::new(),
        }
    }

    /// Handle one update end-to-end. Returns the reply text, or `None` for
    /// updates that get no reply (unknown commands, unrecognized content).
    pub async fn dispatch(&self, update: Update) -> Option<String> {
        match update {
            Update::Command { command, .. } if command == "/start" => Some(GREETING.to_string()),
            Update::Command { command, .. } => {
                info!("Ignoring unknown command {}", command);
                None
            }
            Update::Voice {
                user_id, file_id, ..
            } => Some(self.handle_voice(user_id, &file_id).await),
            Update::Photo { user_id, sizes, .. } => Some(self.handle_photo(user_id, &sizes).await),
            Update::Unrecognized { chat_id } => {
                info!("Ignoring unrecognized update from chat {}", chat_id);
                None
            }
        }
    }

    async fn handle_voice(&self, user_id: i64, file_id: &str) -> String {
        let _guard = self.locks.acquire(user_id).await;

        match self.process_voice(user_id, file_id).await {
            Ok(path) => {
                info!("Voice note for user {} saved as {:?}", user_id, path);
                VOICE_SAVED.to_string()
            }
            Err(e) => {
                error!("Voice pipeline failed for user {}: {:?}", user_id, e);
                VOICE_ERROR.to_string()
            }
        }
    }

    async fn process_voice(&self, user_id: i64, file_id: &str) -> Result<PathBuf, PipelineError> {
        let bytes = self.files.download(file_id).await?;
        self.audio.process(user_id, &bytes)
    }

    async fn handle_photo(&self, user_id: i64, sizes: &[PhotoSize]) -> String {
        let _guard = self.locks.acquire(user_id).await;

        // Variants are ordered by resolution, largest last.
        let Some(photo) = sizes.last() else {
            error!("Photo update for user {} carried no variants", user_id);
            return PHOTO_ERROR.to_string();
        };

        match self.photos.process(user_id, photo).await {
            Ok(PhotoOutcome::Saved { faces, path }) => {
                info!(
                    "Photo for user {} kept at {:?} ({} face region(s))",
                    user_id, path, faces
                );
                PHOTO_SAVED.to_string()
            }
            Ok(PhotoOutcome::NoFaces) => PHOTO_NO_FACES.to_string(),
            Err(e) => {
                error!("Photo pipeline failed for user {}: {:?}", user_id, e);
                PHOTO_ERROR.to_string()
            }
        }
    }
}
