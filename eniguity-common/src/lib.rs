//! # Eniguity Common Library
//!
//! Shared code for the Eniguity diagnostics services:
//! - Error and result types
//! - Layered configuration resolution (CLI → ENV → TOML → compiled defaults)

pub mod config;
pub mod error;

pub use error::{Error, Result};
