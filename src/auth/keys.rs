// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PEM public key inspection.
//!
//! The token library treats keys as opaque, so it cannot tell us *why* an
//! ES256 check failed. This module parses the SubjectPublicKeyInfo just far
//! enough to learn the named curve, which is what decides whether the DER
//! fallback may run, and hands the raw SEC1 point to the manual verifier.

use std::fmt;

use spki::der::Decode;
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

/// `id-ecPublicKey` (RFC 5480).
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// `prime256v1` / `secp256r1`.
const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// `secp384r1`.
const OID_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
/// `secp256k1`.
const OID_SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// PEM label accepted for public keys.
const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// Named curves the manual verifier can check ECDSA/SHA-256 signatures on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256, the curve ES256 expects.
    P256,
    /// NIST P-384.
    P384,
    /// SECG secp256k1.
    Secp256k1,
}

impl Curve {
    /// The curve ES256 is defined over.
    pub const ES256_DEFAULT: Curve = Curve::P256;

    fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        if *oid == OID_P256 {
            Some(Curve::P256)
        } else if *oid == OID_P384 {
            Some(Curve::P384)
        } else if *oid == OID_SECP256K1 {
            Some(Curve::Secp256k1)
        } else {
            None
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::P256 => write!(f, "P-256"),
            Curve::P384 => write!(f, "P-384"),
            Curve::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// Errors raised while reading a PEM public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid PEM: {0}")]
    InvalidPem(String),

    #[error("Unexpected PEM label '{0}' (expected PUBLIC KEY)")]
    UnexpectedLabel(String),

    #[error("Invalid SubjectPublicKeyInfo: {0}")]
    InvalidSpki(String),

    #[error("Key algorithm {0} is not an elliptic-curve public key")]
    NotEllipticCurve(String),

    #[error("Unsupported named curve {0}")]
    UnsupportedCurve(String),
}

/// An elliptic-curve public key decoded from PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: Curve,
    point: Vec<u8>,
}

impl EcPublicKey {
    /// Parse a `-----BEGIN PUBLIC KEY-----` document.
    pub fn from_pem(pem_str: &str) -> Result<Self, KeyError> {
        let pem = pem::parse(pem_str.trim()).map_err(|e| KeyError::InvalidPem(e.to_string()))?;

        if pem.tag() != PUBLIC_KEY_TAG {
            return Err(KeyError::UnexpectedLabel(pem.tag().to_string()));
        }

        Self::from_spki_der(pem.contents())
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, KeyError> {
        let spki = SubjectPublicKeyInfoRef::from_der(der)
            .map_err(|e| KeyError::InvalidSpki(e.to_string()))?;

        if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
            return Err(KeyError::NotEllipticCurve(spki.algorithm.oid.to_string()));
        }

        let curve_oid = spki
            .algorithm
            .parameters_oid()
            .map_err(|e| KeyError::InvalidSpki(format!("missing named curve: {e}")))?;
        let curve = Curve::from_oid(&curve_oid)
            .ok_or_else(|| KeyError::UnsupportedCurve(curve_oid.to_string()))?;

        let point = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| KeyError::InvalidSpki("public key bit string is not octet aligned".into()))?
            .to_vec();

        Ok(Self { curve, point })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// SEC1-encoded curve point.
    pub fn point(&self) -> &[u8] {
        &self.point
    }

    /// Whether the key lives on a curve other than the one ES256 expects.
    pub fn is_curve_mismatch(&self) -> bool {
        self.curve != Curve::ES256_DEFAULT
    }
}
