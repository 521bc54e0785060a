// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multi-key trust policy.
//!
//! ## Policy
//!
//! - Keys are tried in the order they were added; the first one that verifies wins
//! - Production keys are always eligible and always come first
//! - Development keys are consulted only when development mode is on, even if
//!   they are configured in production
//! - Empty key slots are skipped

use std::sync::Arc;

use super::extractor::extract_token_str;
use super::outcome::VerificationOutcome;
use super::verifier::check_signature;

/// When a key may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Trusted in every mode
    Always,
    /// Trusted only in development mode
    DevelopmentOnly,
}

impl KeyScope {
    fn allows(self, development_mode: bool) -> bool {
        match self {
            KeyScope::Always => true,
            KeyScope::DevelopmentOnly => development_mode,
        }
    }
}

/// A PEM public key with a label for logs and its scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    label: String,
    pem: String,
    scope: KeyScope,
}

impl TrustedKey {
    pub fn new(label: impl Into<String>, pem: impl Into<String>, scope: KeyScope) -> Self {
        Self {
            label: label.into(),
            pem: pem.into(),
            scope,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn scope(&self) -> KeyScope {
        self.scope
    }

    fn is_eligible(&self, development_mode: bool) -> bool {
        !self.pem.trim().is_empty() && self.scope.allows(development_mode)
    }
}

/// Ordered set of keys a token may be verified against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: Vec<TrustedKey>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key; it is tried after every key already in the ring.
    pub fn with_key(mut self, key: TrustedKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn with_production_key(self, pem: impl Into<String>) -> Self {
        let label = format!("production-{}", self.keys.len());
        self.with_key(TrustedKey::new(label, pem, KeyScope::Always))
    }

    pub fn with_development_key(self, pem: impl Into<String>) -> Self {
        let label = format!("development-{}", self.keys.len());
        self.with_key(TrustedKey::new(label, pem, KeyScope::DevelopmentOnly))
    }

    pub fn keys(&self) -> &[TrustedKey] {
        &self.keys
    }

    /// Find a token in `input` and verify it against the eligible keys.
    pub fn resolve(&self, input: Option<&str>, development_mode: bool) -> VerificationOutcome {
        let Some(token) = input.and_then(extract_token_str) else {
            tracing::debug!("No token found in input");
            return VerificationOutcome::not_found();
        };

        self.verify_token(token, development_mode)
    }

    /// Verify an already extracted token.
    pub fn verify_token(&self, token: &str, development_mode: bool) -> VerificationOutcome {
        for key in self.keys.iter().filter(|k| k.is_eligible(development_mode)) {
            match check_signature(token, &key.pem) {
                Ok(path) => {
                    tracing::debug!(key = %key.label, ?path, "Token verified");
                    return VerificationOutcome::verified(token);
                }
                Err(e) => {
                    tracing::debug!(key = %key.label, error_code = e.error_code(), "Key did not verify token");
                }
            }
        }

        VerificationOutcome::rejected(token)
    }

    /// Like [`KeyRing::resolve`], with the signature checks run on the blocking pool.
    ///
    /// Extraction happens on the calling task. If the blocking task is lost the
    /// extracted token is reported as failing verification.
    pub async fn resolve_offloaded(
        self: Arc<Self>,
        input: Option<String>,
        development_mode: bool,
    ) -> VerificationOutcome {
        let Some(token) = input.as_deref().and_then(extract_token_str).map(str::to_owned) else {
            return VerificationOutcome::not_found();
        };

        let candidate = token.clone();
        tokio::task::spawn_blocking(move || self.verify_token(&candidate, development_mode))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Verification task failed");
                VerificationOutcome::rejected(token)
            })
    }
}

/// Extract a token and verify it with the primary key, then (development mode
/// only) the secondary key.
pub fn extract_and_verify(
    input: Option<&str>,
    primary_key_pem: &str,
    secondary_key_pem: &str,
    development_mode: bool,
) -> VerificationOutcome {
    KeyRing::new()
        .with_production_key(primary_key_pem)
        .with_development_key(secondary_key_pem)
        .resolve(input, development_mode)
}
