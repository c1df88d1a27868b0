use crate::transport::Message;
use serde::Deserialize;

/// One resolution variant of an incoming photo.
///
/// The transport delivers variants ordered by size, largest last.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// Closed union of inbound update kinds.
///
/// Classification happens exactly once, at ingress; everything downstream
/// matches on this enum instead of probing message attributes.
#[derive(Debug, Clone)]
pub enum Update {
    Command {
        chat_id: i64,
        user_id: i64,
        command: String,
    },
    Voice {
        chat_id: i64,
        user_id: i64,
        file_id: String,
    },
    Photo {
        chat_id: i64,
        user_id: i64,
        sizes: Vec<PhotoSize>,
    },
    Unrecognized {
        chat_id: i64,
    },
}

impl Update {
    /// Classify a transport message into an update kind.
    pub fn classify(message: Message) -> Update {
        let chat_id = message.chat.id;
        let user_id = message.from.as_ref().map_or(chat_id, |u| u.id);

        if let Some(text) = &message.text {
            if text.starts_with('/') {
                let command = text.split_whitespace().next().unwrap_or(text).to_string();
                return Update::Command {
                    chat_id,
                    user_id,
                    command,
                };
            }
        }

        if let Some(voice) = message.voice {
            return Update::Voice {
                chat_id,
                user_id,
                file_id: voice.file_id,
            };
        }

        if let Some(sizes) = message.photo {
            if !sizes.is_empty() {
                return Update::Photo {
                    chat_id,
                    user_id,
                    sizes,
                };
            }
        }

        Update::Unrecognized { chat_id }
    }

    /// Chat to reply to.
    pub fn chat_id(&self) -> i64 {
        match self {
            Update::Command { chat_id, .. }
            | Update::Voice { chat_id, .. }
            | Update::Photo { chat_id, .. }
            | Update::Unrecognized { chat_id } => *chat_id,
        }
    }
}
