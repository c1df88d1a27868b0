use super::decode::{self, PcmBuffer};
use super::resample;
use crate::error::PipelineError;
use crate::storage::{MediaKind, StorageLocator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the transient download slot inside a user's audio partition.
///
/// The slot is fixed so the directory-count version numbering stays
/// deterministic; the per-user lock in the dispatcher keeps concurrent
/// writers off it.
const SCRATCH_NAME: &str = "audio_message.ogg";

/// Converts voice-note payloads into versioned WAV artifacts.
pub struct AudioPipeline {
    locator: StorageLocator,
    target_sample_rate: u32,
}

impl AudioPipeline {
    pub fn new(locator: StorageLocator, target_sample_rate: u32) -> Self {
        Self {
            locator,
            target_sample_rate,
        }
    }

    /// Process one voice note end-to-end.
    ///
    /// Writes the payload to the scratch slot, decodes and resamples it,
    /// exports `audio_message_<N>.wav`, then removes the scratch file. On
    /// failure no partial WAV is left behind; the scratch file may remain
    /// orphaned and is overwritten by the next attempt.
    pub fn process(&self, user_id: i64, ogg_bytes: &[u8]) -> Result<PathBuf, PipelineError> {
        let dir = self.locator.resolve(user_id, MediaKind::Audio)?;

        let scratch = dir.join(SCRATCH_NAME);
        fs::write(&scratch, ogg_bytes)?;

        let decoded = decode::decode_file(&scratch)?;
        let converted = resample::resample(&decoded, self.target_sample_rate);

        // Version = directory entry count minus one; the scratch file is
        // one of the entries, so numbering starts at 0.
        let version = fs::read_dir(&dir)?.count().saturating_sub(1);
        let wav_path = dir.join(format!("audio_message_{}.wav", version));

        if let Err(e) = write_wav(&wav_path, &converted) {
            if let Err(remove_err) = fs::remove_file(&wav_path) {
                warn!("Failed to remove partial WAV {:?}: {}", wav_path, remove_err);
            }
            return Err(e);
        }

        fs::remove_file(&scratch)?;

        info!(
            "Saved voice note for user {} as {:?} ({}Hz, {} channels)",
            user_id, wav_path, converted.sample_rate, converted.channels
        );

        Ok(wav_path)
    }
}

fn write_wav(path: &Path, pcm: &PcmBuffer) -> Result<(), PipelineError> {
    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &pcm.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
