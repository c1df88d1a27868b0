use anyhow::{Context, Result};
use clap::Parser;
use media_keeper::{
    AudioPipeline, CascadeDetector, Config, Dispatcher, FacePipeline, HttpFileFetcher,
    StorageLocator, TelegramClient, Update,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "media-keeper", about = "Archives voice notes and face photos per user")]
struct Cli {
    /// Path to the configuration file (optional; defaults apply without it)
    #[arg(long, default_value = "config/media-keeper")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let token = std::env::var("BOT_TOKEN").context("BOT_TOKEN environment variable is not set")?;

    info!("media-keeper v0.1.0");
    info!("Audio storage root: {}", cfg.storage.audio_root);
    info!("Photo storage root: {}", cfg.storage.photo_root);
    info!("Target sample rate: {} Hz", cfg.audio.sample_rate);

    let client = Arc::new(TelegramClient::new(&cfg.telegram.api_base, token.clone())?);
    let fetcher = Arc::new(HttpFileFetcher::new(
        &cfg.telegram.api_base,
        token,
        Duration::from_secs(cfg.fetch.timeout_secs),
    )?);
    let detector = Arc::new(CascadeDetector::new(cfg.detector.clone()));

    let locator = StorageLocator::new(&cfg.storage);
    let audio = AudioPipeline::new(locator.clone(), cfg.audio.sample_rate);
    let photos = FacePipeline::new(locator, client.clone(), fetcher, detector);
    let dispatcher = Dispatcher::new(audio, photos, client.clone());

    run_polling(client, dispatcher, cfg.telegram.poll_timeout_secs).await
}

/// Consume the update stream, one update fully processed before the next.
///
/// Per-update failures are absorbed by the dispatcher; only polling itself
/// can fail here, and that is retried after a short pause.
async fn run_polling(
    client: Arc<TelegramClient>,
    dispatcher: Dispatcher,
    poll_timeout_secs: u64,
) -> Result<()> {
    let mut offset = 0i64;

    info!("Polling for updates");

    loop {
        let updates = match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("getUpdates failed: {:#}", e);
                tokio::time::sleep(Duration::from_secs(2)).await;
                continue;
            }
        };

        for raw in updates {
            offset = raw.update_id + 1;

            let Some(message) = raw.message else { continue };
            let update = Update::classify(message);
            let chat_id = update.chat_id();

            if let Some(reply) = dispatcher.dispatch(update).await {
                if let Err(e) = client.send_message(chat_id, &reply).await {
                    error!("Failed to reply to chat {}: {:#}", chat_id, e);
                }
            }
        }
    }
}
