// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `jwt-verify`: extract and verify an embedded token from the command line.
//!
//! ```text
//! JWT_PUBLIC_KEY_PATH=prod.pem jwt-verify "my token is eyJ...x.eyJ...y.sig"
//! echo "eyJ...x.eyJ...y.sig" | JWT_PUBLIC_KEY_PATH=prod.pem jwt-verify
//! ```
//!
//! Prints the outcome as JSON. Exit status: 0 valid, 1 invalid, 2 config error.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use relational_jwt_verifier::config::{LogFormat, VerifierConfig};

const EXIT_INVALID: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let log_format = match LogFormat::from_env() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    init_tracing(log_format);

    let config = match VerifierConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load verifier configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let input = match read_input().await {
        Ok(input) => input,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read input");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let ring = config.key_ring();
    tracing::info!(
        development_mode = config.development_mode,
        keys = ring.keys().len(),
        "Verifying input"
    );

    let outcome = Arc::new(ring)
        .resolve_offloaded(Some(input), config.development_mode)
        .await;

    match serde_json::to_string(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize outcome");
            return ExitCode::from(EXIT_INVALID);
        }
    }

    if outcome.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Command-line arguments joined by spaces, or stdin when none are given.
async fn read_input() -> std::io::Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}
