// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CERT_GENERATION";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub users_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub spool_dir: PathBuf,
}

impl Config {
    /// Reads a TOML file, then applies `CERT_GENERATION__SECTION__KEY`
    /// environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = settings
            .try_deserialize()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// `~/cert-generation/config.toml`, using the invoking user's home under sudo.
    pub fn default_path() -> Result<PathBuf> {
        resolve_default_path(env::var("SUDO_USER").ok(), home::home_dir)
    }
}

fn resolve_default_path(
    sudo_user: Option<String>,
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf> {
    let user_home = match sudo_user {
        Some(user) => PathBuf::from(format!("/home/{}", user)),
        None => home_dir().context("Could not determine user home directory")?,
    };
    Ok(user_home.join("cert-generation").join("config.toml"))
}
