// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! The verification functions never touch the environment. Hosts (and the
//! bundled `jwt-verify` binary) use this module to load key material and the
//! development-mode flag, then pass them in.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_PUBLIC_KEY_PEM` | Production public key (PEM text) | Required unless `_PATH` is set |
//! | `JWT_PUBLIC_KEY_PATH` | File holding the production public key | - |
//! | `JWT_DEV_PUBLIC_KEY_PEM` | Development public key (PEM text) | Optional |
//! | `JWT_DEV_PUBLIC_KEY_PATH` | File holding the development public key | Optional |
//! | `APP_ENV` | `development` enables the development key | `production` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;

use crate::auth::KeyRing;
use crate::error::ConfigError;

pub const PUBLIC_KEY_PEM_ENV: &str = "JWT_PUBLIC_KEY_PEM";
pub const PUBLIC_KEY_PATH_ENV: &str = "JWT_PUBLIC_KEY_PATH";
pub const DEV_PUBLIC_KEY_PEM_ENV: &str = "JWT_DEV_PUBLIC_KEY_PEM";
pub const DEV_PUBLIC_KEY_PATH_ENV: &str = "JWT_DEV_PUBLIC_KEY_PATH";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// `APP_ENV` value that turns on development mode.
const DEVELOPMENT_ENV: &str = "development";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidValue {
                var: LOG_FORMAT_ENV.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .map_or(Ok(LogFormat::default()), |v| LogFormat::parse(&v))
    }
}

/// Key material and mode for a verification host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub production_key_pem: String,
    pub development_key_pem: Option<String>,
    pub development_mode: bool,
}

impl VerifierConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production_key_pem = read_key(&lookup, PUBLIC_KEY_PEM_ENV, PUBLIC_KEY_PATH_ENV)?
            .ok_or_else(|| {
                ConfigError::MissingVar(format!("{PUBLIC_KEY_PEM_ENV} or {PUBLIC_KEY_PATH_ENV}"))
            })?;
        let development_key_pem = read_key(&lookup, DEV_PUBLIC_KEY_PEM_ENV, DEV_PUBLIC_KEY_PATH_ENV)?;

        let development_mode = lookup(APP_ENV_ENV)
            .map(|v| v.trim().eq_ignore_ascii_case(DEVELOPMENT_ENV))
            .unwrap_or(false);

        if development_key_pem.is_some() && !development_mode {
            tracing::info!("Development key configured but ignored outside development mode");
        }

        Ok(Self {
            production_key_pem,
            development_key_pem,
            development_mode,
        })
    }

    /// Production key first, then the development key if one is set.
    pub fn key_ring(&self) -> KeyRing {
        let ring = KeyRing::new().with_production_key(self.production_key_pem.clone());
        match &self.development_key_pem {
            Some(pem) => ring.with_development_key(pem.clone()),
            None => ring,
        }
    }
}

/// Inline PEM wins over a path; blank values count as unset.
fn read_key<F>(lookup: &F, pem_var: &str, path_var: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(inline) = lookup(pem_var).filter(|v| !v.trim().is_empty()) {
        // Single-line env vars commonly carry escaped newlines.
        return Ok(Some(inline.replace("\\n", "\n")));
    }

    let Some(path) = lookup(path_var).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(path.trim());
    let contents =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::KeyFile { path, source })?;
    Ok(Some(contents))
}
