use super::RemoteFiles;
use crate::error::PipelineError;
use crate::update::PhotoSize;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Bound on non-polling Bot API requests and file downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Wire types (minimal Bot API subset)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub voice: Option<Voice>,
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TelegramFile {
    file_path: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Thin Bot API client: long-poll updates in, text replies out, plus the
/// file download primitive.
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Long-poll for new updates starting at `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<TelegramUpdate>> {
        let response: ApiResponse<Vec<TelegramUpdate>> = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", timeout_secs.to_string()),
            ])
            // Leave the long poll room to complete before the request times
            // out on our side.
            .timeout(Duration::from_secs(timeout_secs + 10))
            .send()
            .await
            .context("getUpdates request failed")?
            .json()
            .await
            .context("getUpdates response was not valid JSON")?;

        Ok(into_result(response)?)
    }

    /// Send one text reply to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("sendMessage request failed")?
            .json()
            .await
            .context("sendMessage response was not valid JSON")?;

        into_result(response)?;
        Ok(())
    }

    async fn get_file(&self, file_id: &str) -> Result<TelegramFile, PipelineError> {
        let response: ApiResponse<TelegramFile> = self
            .http
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        into_result(response)
    }
}

#[async_trait::async_trait]
impl RemoteFiles for TelegramClient {
    async fn file_path(&self, file_id: &str) -> Result<String, PipelineError> {
        let file = self.get_file(file_id).await?;
        file.file_path.ok_or_else(|| {
            PipelineError::TransportFetch(format!("no downloadable path for file {}", file_id))
        })
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, PipelineError> {
        let file_path = self.file_path(file_id).await?;
        let url = format!("{}/file/bot{}/{}", self.api_base, self.token, file_path);

        let response = self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::TransportFetch(format!(
                "unexpected HTTP status {} for {}",
                status, file_path
            )));
        }

        let bytes = response.bytes().await?;
        info!("Downloaded {} bytes for file {}", bytes.len(), file_id);

        Ok(bytes.to_vec())
    }
}

fn into_result<T>(response: ApiResponse<T>) -> Result<T, PipelineError> {
    if !response.ok {
        return Err(PipelineError::TransportFetch(
            response
                .description
                .unwrap_or_else(|| "Bot API returned ok=false".to_string()),
        ));
    }

    response
        .result
        .ok_or_else(|| PipelineError::TransportFetch("Bot API response had no result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new("https://api.telegram.org", "123:abc".to_string()).unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_update_deserialization() {
        let json = r#"{
            "update_id": 7,
            "message": {
                "message_id": 1,
                "from": {"id": 42, "first_name": "A"},
                "chat": {"id": 42, "type": "private"},
                "voice": {"file_id": "v-1", "duration": 2}
            }
        }"#;

        let update: TelegramUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 7);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.voice.unwrap().file_id, "v-1");
    }

    #[test]
    fn test_api_error_maps_to_transport_fetch() {
        let response: ApiResponse<Vec<TelegramUpdate>> =
            serde_json::from_str(r#"{"ok": false, "description": "Unauthorized"}"#).unwrap();

        let err = into_result(response).unwrap_err();
        match err {
            PipelineError::TransportFetch(detail) => assert_eq!(detail, "Unauthorized"),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
