//! Utility modules for eniguity-diag

pub mod audio_decoder;
pub mod spectral;

pub use audio_decoder::{decode_audio_file, DecodedAudio};
