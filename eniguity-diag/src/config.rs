//! Service configuration for eniguity-diag
//!
//! Each setting resolves CLI → environment → TOML → compiled default through
//! [`eniguity_common::config::resolve_setting`].

use clap::Parser;
use eniguity_common::config::{resolve_setting, resolve_toml_config, CompiledDefaults, TomlConfig};
use eniguity_common::Result;
use std::path::PathBuf;

use crate::db::database_url_for;

/// Command-line arguments for eniguity-diag
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "eniguity-diag")]
#[command(about = "Vehicle audio diagnostics service")]
#[command(version)]
pub struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data folder holding the database
    #[arg(short, long, value_name = "DIR")]
    pub root_folder: Option<PathBuf>,

    /// Database file name (without .db)
    #[arg(long)]
    pub database_name: Option<String>,

    /// Explicit sqlx connection string, overrides root folder and name
    #[arg(long)]
    pub database_url: Option<String>,

    /// Listen address
    #[arg(short, long)]
    pub bind_address: Option<String>,

    /// Directory for staged uploads
    #[arg(long, value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Request body limit for uploads
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Default log level when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_url: String,
    pub bind_address: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ServiceConfig {
    /// Load the TOML file named by the arguments (if any) and resolve
    pub fn load(args: Args) -> Result<Self> {
        let toml = resolve_toml_config(args.config.as_deref())?;
        Self::resolve(args, toml, CompiledDefaults::for_current_platform())
    }

    pub fn resolve(args: Args, toml: TomlConfig, defaults: CompiledDefaults) -> Result<Self> {
        let root_folder = resolve_setting(
            args.root_folder,
            "ENIGUITY_ROOT_FOLDER",
            toml.root_folder,
            defaults.root_folder,
        )?;
        let database_name = resolve_setting(
            args.database_name,
            "ENIGUITY_DATABASE_NAME",
            toml.database_name,
            defaults.database_name,
        )?;

        let database_url = match args
            .database_url
            .or_else(|| std::env::var("ENIGUITY_DATABASE_URL").ok())
            .or(toml.database_url)
        {
            Some(url) => url,
            None => database_url_for(&root_folder.join(format!("{}.db", database_name))),
        };

        Ok(Self {
            database_url,
            bind_address: resolve_setting(
                args.bind_address,
                "ENIGUITY_BIND_ADDRESS",
                toml.bind_address,
                defaults.bind_address,
            )?,
            upload_dir: resolve_setting(
                args.upload_dir,
                "ENIGUITY_UPLOAD_DIR",
                toml.upload_dir,
                defaults.upload_dir,
            )?,
            max_upload_bytes: resolve_setting(
                args.max_upload_bytes,
                "ENIGUITY_MAX_UPLOAD_BYTES",
                toml.max_upload_bytes,
                defaults.max_upload_bytes,
            )?,
            log_level: resolve_setting(
                args.log_level,
                "ENIGUITY_LOG_LEVEL",
                Some(toml.logging.level),
                defaults.log_level,
            )?,
            root_folder,
        })
    }
}
