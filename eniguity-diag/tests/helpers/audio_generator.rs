//! Audio Test Fixture Generator
//!
//! In-memory WAV clips for upload tests

use std::io::Cursor;

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 22050,
            channels: 1,
            amplitude: 0.3,
        }
    }
}

fn encode_wav(config: &AudioConfig, mut sample_at: impl FnMut(usize) -> f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

        for i in 0..total_samples {
            let sample = (sample_at(i) * i16::MAX as f32) as i16;
            for _ in 0..config.channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Pure sine tone
pub fn tone_wav_bytes(freq: f32, config: &AudioConfig) -> Vec<u8> {
    let rate = config.sample_rate as f32;
    let amplitude = config.amplitude;
    encode_wav(config, |i| {
        amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate).sin()
    })
}

/// Uniform white noise from a fixed-seed LCG
pub fn white_noise_wav_bytes(config: &AudioConfig) -> Vec<u8> {
    let amplitude = config.amplitude;
    let mut state: u32 = 0x1234_5678;
    encode_wav(config, |_| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        amplitude * ((state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_has_riff_header_and_expected_length() {
        let bytes = tone_wav_bytes(440.0, &AudioConfig::default());
        assert_eq!(&bytes[0..4], b"RIFF");
        // 44-byte header + 22050 16-bit samples
        assert_eq!(bytes.len(), 44 + 22050 * 2);
    }
}
