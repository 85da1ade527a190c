//! Audio Decoding Utilities
//!
//! **Purpose:** Decode a staged upload to mono f32 PCM at its native sample rate
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, AAC/M4A, OGG Vorbis).
//! No resampling is performed.

use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

/// Decode audio file to mono f32 PCM samples
///
/// **Algorithm:**
/// 1. Probe the container, using the file extension as a format hint
/// 2. Pick the first track with a known codec
/// 3. Decode every packet of that track, skipping corrupt packets
/// 4. Average all channels down to mono
///
/// # Errors
/// * File I/O errors
/// * Unrecognized or empty container
/// * No decodable audio track
pub fn decode_audio_file(file_path: &Path) -> Result<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open audio file: {}", file_path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Unrecognized or corrupt audio container")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate unknown")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Unsupported audio codec")?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(anyhow::anyhow!("Error reading packet: {}", e));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                channels = decoded.spec().channels.count();
                mix_buffer_to_mono(&decoded, &mut samples);
            }
            // Corrupt packet: drop it and keep going
            Err(SymphoniaError::DecodeError(msg)) => {
                tracing::warn!(path = %file_path.display(), error = %msg, "Skipping undecodable packet");
            }
            Err(e) => {
                return Err(anyhow::anyhow!("Failed to decode packet: {}", e));
            }
        }
    }

    let duration_seconds = samples.len() as f64 / sample_rate as f64;

    tracing::debug!(
        path = %file_path.display(),
        sample_rate = sample_rate,
        channels = channels,
        total_samples = samples.len(),
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
        duration_seconds,
    })
}

/// Append a decoded buffer to `out` as mono f32
fn mix_buffer_to_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => mix_to_mono(buf, out),
        AudioBufferRef::U16(buf) => mix_to_mono(buf, out),
        AudioBufferRef::U24(buf) => mix_to_mono(buf, out),
        AudioBufferRef::U32(buf) => mix_to_mono(buf, out),
        AudioBufferRef::S8(buf) => mix_to_mono(buf, out),
        AudioBufferRef::S16(buf) => mix_to_mono(buf, out),
        AudioBufferRef::S24(buf) => mix_to_mono(buf, out),
        AudioBufferRef::S32(buf) => mix_to_mono(buf, out),
        AudioBufferRef::F32(buf) => mix_to_mono(buf, out),
        AudioBufferRef::F64(buf) => mix_to_mono(buf, out),
    }
}

/// Average all channels of one buffer
fn mix_to_mono<S>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return;
    }

    out.reserve(buf.frames());
    for frame_idx in 0..buf.frames() {
        let sum: f32 = (0..num_channels)
            .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
            .sum();
        out.push(sum / num_channels as f32);
    }
}
