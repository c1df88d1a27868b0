use super::decode::PcmBuffer;

/// Resample a PCM buffer to a target rate by linear interpolation.
///
/// Channel count is preserved; each channel is interpolated independently
/// across interleaved frames. A buffer already at the target rate is
/// returned unchanged.
pub fn resample(input: &PcmBuffer, target_rate: u32) -> PcmBuffer {
    if input.sample_rate == target_rate || input.channels == 0 {
        return input.clone();
    }

    let channels = input.channels as usize;
    let frames_in = input.frame_count();
    if frames_in == 0 {
        return PcmBuffer {
            samples: Vec::new(),
            sample_rate: target_rate,
            channels: input.channels,
        };
    }

    let frames_out =
        ((frames_in as u64 * target_rate as u64) / input.sample_rate as u64) as usize;
    let mut samples = Vec::with_capacity(frames_out * channels);

    let step = input.sample_rate as f64 / target_rate as f64;

    for i in 0..frames_out {
        let pos = i as f64 * step;
        let base = pos.floor() as usize;
        let frac = pos - base as f64;
        let next = (base + 1).min(frames_in - 1);

        for ch in 0..channels {
            let a = input.samples[base * channels + ch] as f64;
            let b = input.samples[next * channels + ch] as f64;
            let value = a + (b - a) * frac;
            samples.push(value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
        }
    }

    PcmBuffer {
        samples,
        sample_rate: target_rate,
        channels: input.channels,
    }
}
