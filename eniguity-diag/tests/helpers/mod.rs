//! Test Helper Utilities
//!
//! Shared utilities for testing eniguity-diag

#![allow(dead_code)]

pub mod app;
pub mod audio_generator;

pub use app::{multipart_upload, read_json, TestApp};
pub use audio_generator::{tone_wav_bytes, white_noise_wav_bytes, AudioConfig};
