// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Verification Module
//!
//! Finds an ES256 token embedded in free-form text and checks its signature
//! against a production-first set of PEM public keys.
//!
//! ## Flow
//!
//! 1. Host hands over candidate text plus key material
//! 2. `extractor` pulls out the first `xxx.yyy.zzz` token shape
//! 3. `resolver` walks the key ring in order:
//!    - production keys always
//!    - development keys only in development mode
//! 4. `verifier` checks each key:
//!    - `jsonwebtoken` ES256 first
//!    - DER fallback (`der` + `manual`) when the key is on another curve
//!
//! ## Security
//!
//! - Signature only: expiry, issuer and audience are the host's concern
//! - Nothing here panics or returns an error to the host; every failure is a
//!   `false` or a rejected outcome
//! - Key material and token text are never logged

pub mod der;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod manual;
pub mod outcome;
pub mod resolver;
pub mod verifier;

pub use error::SignatureError;
pub use extractor::extract_token;
pub use keys::Curve;
pub use outcome::{OutcomeError, VerificationOutcome};
pub use resolver::{extract_and_verify, KeyRing, KeyScope, TrustedKey};
pub use verifier::{verify_signature, VerificationPath};
