// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ES256 signature verification for a single token and key.
//!
//! ## Paths
//!
//! 1. **Standard**: `jsonwebtoken` checks the raw ES256 signature over
//!    `header.payload`. Segments are opaque; nothing is parsed as JSON and no
//!    claim is ever enforced here.
//! 2. **Fallback**: when the key is a valid ECDSA key on a curve other than
//!    P-256, the same raw signature is converted to DER and checked by
//!    [`super::manual`] against the same signing input.
//!
//! The library reports a wrong-curve key as an ordinary signature or key
//! failure, so the mismatch is recognised from the error kind plus the key's
//! named-curve OID rather than from error message text.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey};

use super::der::RawSignature;
use super::error::SignatureError;
use super::keys::{Curve, EcPublicKey};
use super::manual;

/// Which path confirmed the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPath {
    /// Verified by the token library
    Standard,
    /// Verified through DER conversion on a non-default curve
    Fallback { curve: Curve },
}

/// Return whether `token` carries a valid ES256 signature under `public_key_pem`.
pub fn verify_signature(token: &str, public_key_pem: &str) -> bool {
    match check_signature(token, public_key_pem) {
        Ok(path) => {
            tracing::debug!(?path, "Token signature verified");
            true
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), error = %e, "Token signature rejected");
            false
        }
    }
}

/// Detailed form of [`verify_signature`].
pub fn check_signature(token: &str, public_key_pem: &str) -> Result<VerificationPath, SignatureError> {
    if token.trim().is_empty() || public_key_pem.trim().is_empty() {
        return Err(SignatureError::EmptyInput);
    }

    let (message, signature) = split_signing_input(token)?;
    let raw = RawSignature::from_segment(signature)?;

    let err = match verify_standard(message, signature, public_key_pem) {
        Ok(true) => return Ok(VerificationPath::Standard),
        Ok(false) => None,
        Err(e) => Some(e),
    };

    let err = classify(err.as_ref(), public_key_pem);
    if !err.allows_fallback() {
        return Err(err);
    }

    tracing::debug!(error = %err, "ES256 verification refused key curve, retrying with DER signature");
    let curve = manual::check_der(message.as_bytes(), &raw.to_der(), public_key_pem)?;
    Ok(VerificationPath::Fallback { curve })
}

fn verify_standard(message: &str, signature: &str, public_key_pem: &str) -> Result<bool, JwtError> {
    let key = DecodingKey::from_ec_pem(public_key_pem.as_bytes())?;
    jsonwebtoken::crypto::verify(signature, message.as_bytes(), &key, Algorithm::ES256)
}

/// Map a token library failure (`None` when it simply said "no") onto the
/// fallback decision.
fn classify(err: Option<&JwtError>, public_key_pem: &str) -> SignatureError {
    if let Some(err) = err {
        if matches!(
            err.kind(),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_)
        ) {
            return SignatureError::MalformedToken(err.to_string());
        }
    }

    let key = match EcPublicKey::from_pem(public_key_pem) {
        Ok(key) => key,
        Err(key_err) => return key_err.into(),
    };

    if key.is_curve_mismatch() {
        return SignatureError::CurveMismatch {
            expected: Curve::ES256_DEFAULT,
            actual: key.curve(),
        };
    }

    match err {
        Some(err) if !matches!(err.kind(), ErrorKind::InvalidSignature) => {
            SignatureError::MalformedKey(err.to_string())
        }
        _ => SignatureError::SignatureInvalid,
    }
}

/// Split `header.payload.signature` into the signed message and signature segment.
fn split_signing_input(token: &str) -> Result<(&str, &str), SignatureError> {
    let (message, signature) = token
        .rsplit_once('.')
        .ok_or_else(|| SignatureError::MalformedToken("token has no signature segment".into()))?;

    if token.split('.').count() != 3 {
        return Err(SignatureError::MalformedToken(
            "token must have exactly three segments".into(),
        ));
    }

    Ok((message, signature))
}
