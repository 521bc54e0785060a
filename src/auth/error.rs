// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature verification errors.
//!
//! These never reach callers of the public boolean/outcome API. They exist so
//! the verifier can decide whether the DER fallback is allowed and so the
//! resolver can log a stable reason code.

use super::keys::{Curve, KeyError};

/// Why a token failed to verify under one key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Token or key was empty
    #[error("Token or public key is empty")]
    EmptyInput,

    /// Token does not have the expected shape or encoding
    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    /// Key material could not be parsed
    #[error("Public key is malformed: {0}")]
    MalformedKey(String),

    /// Key parsed but is not usable for ECDSA/SHA-256
    #[error("Public key is not supported: {0}")]
    UnsupportedKey(String),

    /// Key is valid for ECDSA/SHA-256 but on a different curve than ES256 expects
    #[error("ES256 requires curve {expected}, key uses {actual}")]
    CurveMismatch { expected: Curve, actual: Curve },

    /// Signature does not verify
    #[error("Token signature is invalid")]
    SignatureInvalid,
}

impl SignatureError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            SignatureError::EmptyInput => "empty_input",
            SignatureError::MalformedToken(_) => "malformed_token",
            SignatureError::MalformedKey(_) => "malformed_key",
            SignatureError::UnsupportedKey(_) => "unsupported_key",
            SignatureError::CurveMismatch { .. } => "curve_mismatch",
            SignatureError::SignatureInvalid => "invalid_signature",
        }
    }

    /// Only a curve mismatch may be retried through the DER fallback.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, SignatureError::CurveMismatch { .. })
    }
}

impl From<KeyError> for SignatureError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::NotEllipticCurve(_) | KeyError::UnsupportedCurve(_) => {
                SignatureError::UnsupportedKey(err.to_string())
            }
            KeyError::InvalidPem(_) | KeyError::UnexpectedLabel(_) | KeyError::InvalidSpki(_) => {
                SignatureError::MalformedKey(err.to_string())
            }
        }
    }
}
