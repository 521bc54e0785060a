// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Curve-agnostic ECDSA/SHA-256 verification over DER signatures.
//!
//! Used when the token library refuses a key because it is not on P-256.
//! The curve is read from the key itself and dispatched to `ring` (NIST
//! curves) or `k256` (secp256k1).

use k256::ecdsa::signature::Verifier;
use ring::signature::{self, UnparsedPublicKey, VerificationAlgorithm};

use super::error::SignatureError;
use super::keys::{Curve, EcPublicKey};

/// Verify `der_signature` over `message` with the PEM public key.
///
/// Every failure, including unparsable keys, collapses to `false`.
pub fn verify_der(message: &[u8], der_signature: &[u8], public_key_pem: &str) -> bool {
    match check_der(message, der_signature, public_key_pem) {
        Ok(curve) => {
            tracing::debug!(%curve, "DER signature verified");
            true
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), error = %e, "DER signature rejected");
            false
        }
    }
}

/// Detailed form of [`verify_der`]; returns the curve that verified.
pub fn check_der(
    message: &[u8],
    der_signature: &[u8],
    public_key_pem: &str,
) -> Result<Curve, SignatureError> {
    let key = EcPublicKey::from_pem(public_key_pem)?;
    check_der_with_key(message, der_signature, &key)?;
    Ok(key.curve())
}

fn check_der_with_key(
    message: &[u8],
    der_signature: &[u8],
    key: &EcPublicKey,
) -> Result<(), SignatureError> {
    match key.curve() {
        Curve::P256 => verify_nist(&signature::ECDSA_P256_SHA256_ASN1, message, der_signature, key),
        Curve::P384 => verify_nist(&signature::ECDSA_P384_SHA256_ASN1, message, der_signature, key),
        Curve::Secp256k1 => verify_secp256k1(message, der_signature, key),
    }
}

fn verify_nist(
    algorithm: &'static dyn VerificationAlgorithm,
    message: &[u8],
    der_signature: &[u8],
    key: &EcPublicKey,
) -> Result<(), SignatureError> {
    // ring rejects off-curve points and malformed DER as a plain verification failure.
    UnparsedPublicKey::new(algorithm, key.point())
        .verify(message, der_signature)
        .map_err(|_| SignatureError::SignatureInvalid)
}

fn verify_secp256k1(
    message: &[u8],
    der_signature: &[u8],
    key: &EcPublicKey,
) -> Result<(), SignatureError> {
    let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(key.point())
        .map_err(|e| SignatureError::MalformedKey(format!("secp256k1 point: {e}")))?;

    let signature = k256::ecdsa::Signature::from_der(der_signature)
        .map_err(|e| SignatureError::MalformedToken(format!("DER signature: {e}")))?;
    // High-S signatures are valid ECDSA; normalise before handing to k256.
    let signature = signature.normalize_s().unwrap_or(signature);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::der::p1363_to_der;
    use crate::auth::keys::test_keys::{p384_public_pem, P256Signer, Secp256k1Signer};

    const MESSAGE: &[u8] = b"eyJhbGciOiJFUzI1NiJ9.eyJzdWIiOiJ1c2VyIn0";

    #[test]
    fn verifies_secp256k1_signature() {
        let signer = Secp256k1Signer::from_seed(3);
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert!(verify_der(MESSAGE, &der, &signer.public_pem()));
        assert_eq!(
            check_der(MESSAGE, &der, &signer.public_pem()),
            Ok(Curve::Secp256k1)
        );
    }

    #[test]
    fn verifies_p256_signature() {
        let signer = P256Signer::generate();
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert!(verify_der(MESSAGE, &der, &signer.public_pem()));
    }

    #[test]
    fn rejects_tampered_message() {
        let signer = Secp256k1Signer::from_seed(3);
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert!(!verify_der(b"eyJhbGciOiJFUzI1NiJ9.eyJzdWIiOiJhZG1pbiJ9", &der, &signer.public_pem()));
    }

    #[test]
    fn rejects_signature_from_other_key() {
        let signer = Secp256k1Signer::from_seed(3);
        let other = Secp256k1Signer::from_seed(4);
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert!(!verify_der(MESSAGE, &der, &other.public_pem()));
    }

    #[test]
    fn rejects_malformed_der() {
        let signer = Secp256k1Signer::from_seed(3);
        assert!(!verify_der(MESSAGE, &[0x30, 0x02, 0x02], &signer.public_pem()));
        let p256 = P256Signer::generate();
        assert!(!verify_der(MESSAGE, &[0x30, 0x02, 0x02], &p256.public_pem()));
    }

    #[test]
    fn rejects_unparsable_key() {
        let signer = Secp256k1Signer::from_seed(3);
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert!(!verify_der(MESSAGE, &der, "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"));
        assert!(!verify_der(MESSAGE, &der, ""));
    }

    #[test]
    fn p384_key_rejects_foreign_signature() {
        let signer = Secp256k1Signer::from_seed(3);
        let der = p1363_to_der(&signer.sign_raw(MESSAGE)).unwrap();
        assert_eq!(
            check_der(MESSAGE, &der, &p384_public_pem()),
            Err(SignatureError::SignatureInvalid)
        );
    }
}
