// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational JWT Verifier - Embedded ES256 Token Verification
//!
//! This crate extracts a signed token from arbitrary text and verifies its
//! ES256 signature against an ordered set of PEM public keys, falling back to
//! a manual DER check for keys generated on a non-default curve.
//!
//! ## Modules
//!
//! - `auth` - Token extraction, signature verification, key ring policy
//! - `config` - Environment-driven key configuration for hosts
//! - `error` - Configuration errors

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{extract_and_verify, extract_token, verify_signature, VerificationOutcome};
