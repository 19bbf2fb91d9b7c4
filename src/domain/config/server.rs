use std::{env, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_STATIC_DIR: &str = ".";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Per-file cap, applied to each file of a multi upload as well.
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from `HOST`, `PORT`, `UPLOAD_DIR`, `STATIC_DIR`,
    /// `MAX_FILE_SIZE` and `MAX_FILES`, falling back to the defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            max_file_size: parse_var(&lookup, "MAX_FILE_SIZE")?.unwrap_or(defaults.max_file_size),
            max_files: parse_var(&lookup, "MAX_FILES")?.unwrap_or(defaults.max_files),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Human readable size cap used in 413 messages, e.g. `500MB`.
    pub fn max_file_size_label(&self) -> String {
        const MIB: u64 = 1024 * 1024;
        if self.max_file_size >= MIB && self.max_file_size % MIB == 0 {
            format!("{}MB", self.max_file_size / MIB)
        } else {
            format!("{} bytes", self.max_file_size)
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(None),
    }
}
