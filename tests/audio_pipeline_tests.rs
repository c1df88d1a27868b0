// Integration tests for the voice-note pipeline
//
// The decoder probes payloads by content, so these tests synthesize RIFF
// payloads in memory with hound and push them through the full
// scratch/decode/resample/version path.

use anyhow::Result;
use media_keeper::config::StorageConfig;
use media_keeper::{AudioPipeline, StorageLocator};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn make_pipeline(temp: &TempDir) -> AudioPipeline {
    let locator = StorageLocator::new(&StorageConfig {
        audio_root: temp.path().join("audio_messages").display().to_string(),
        photo_root: temp.path().join("photos").display().to_string(),
    });
    AudioPipeline::new(locator, 16000)
}

/// Synthesize a voice payload: a sine tone encoded as 16-bit PCM.
fn make_tone_bytes(sample_rate: u32, channels: u16, seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (sample_rate as f64 * seconds) as usize;
        for i in 0..frames {
            let t = i as f64 / sample_rate as f64;
            let value = (t * 440.0 * 2.0 * std::f64::consts::PI).sin();
            let sample = (value * 8000.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn user_dir(temp: &TempDir, user_id: i64) -> std::path::PathBuf {
    temp.path().join("audio_messages").join(user_id.to_string())
}

fn read_spec(path: &Path) -> hound::WavSpec {
    hound::WavReader::open(path).unwrap().spec()
}

#[test]
fn test_voice_note_is_archived_at_16khz() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);
    let payload = make_tone_bytes(8000, 1, 1.0);

    let saved = pipeline.process(42, &payload)?;

    assert!(saved.ends_with("audio_message_0.wav"), "got {:?}", saved);
    assert!(saved.exists());

    let spec = read_spec(&saved);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);

    // 1 second at 8kHz upsampled to 16kHz is ~16000 frames.
    let reader = hound::WavReader::open(&saved)?;
    let frames = reader.len() / spec.channels as u32;
    assert!(
        (15900..=16100).contains(&frames),
        "expected ~16000 frames, got {}",
        frames
    );

    // The transient download must be gone after a successful run.
    assert!(!user_dir(&temp, 42).join("audio_message.ogg").exists());

    Ok(())
}

#[test]
fn test_versions_increment_sequentially() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);
    let payload = make_tone_bytes(16000, 1, 0.2);

    let first = pipeline.process(7, &payload)?;
    let second = pipeline.process(7, &payload)?;
    let third = pipeline.process(7, &payload)?;

    assert!(first.ends_with("audio_message_0.wav"));
    assert!(second.ends_with("audio_message_1.wav"));
    assert!(third.ends_with("audio_message_2.wav"));
    assert!(first.exists() && second.exists() && third.exists());

    Ok(())
}

#[test]
fn test_versions_are_per_user() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);
    let payload = make_tone_bytes(16000, 1, 0.1);

    pipeline.process(1, &payload)?;
    let other = pipeline.process(2, &payload)?;

    // A different user's first note starts back at 0.
    assert!(other.ends_with("audio_message_0.wav"));

    Ok(())
}

#[test]
fn test_stereo_source_stays_stereo() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);
    let payload = make_tone_bytes(8000, 2, 0.5);

    let saved = pipeline.process(5, &payload)?;
    let spec = read_spec(&saved);

    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 2);

    Ok(())
}

#[test]
fn test_failed_note_does_not_disturb_numbering() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);

    // A bad payload fails and leaves only the orphaned scratch slot behind.
    assert!(pipeline.process(9, b"junk payload").is_err());

    // The next valid note overwrites the scratch slot, so it still gets
    // version 0.
    let payload = make_tone_bytes(16000, 1, 0.1);
    let saved = pipeline.process(9, &payload)?;

    assert!(saved.ends_with("audio_message_0.wav"));
    assert!(!user_dir(&temp, 9).join("audio_message.ogg").exists());

    Ok(())
}

#[test]
fn test_invalid_payload_leaves_no_wav() -> Result<()> {
    let temp = TempDir::new()?;
    let pipeline = make_pipeline(&temp);

    assert!(pipeline.process(11, &[0u8; 64]).is_err());

    let wavs: Vec<_> = fs::read_dir(user_dir(&temp, 11))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "wav"))
        .collect();
    assert!(wavs.is_empty());

    Ok(())
}
