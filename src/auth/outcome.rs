// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verification verdict returned to the host.

use std::fmt;

use serde::{Serialize, Serializer};

/// Why an outcome is not valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeError {
    /// Input contained no token-shaped text
    NoTokenFound,
    /// A token was found but no eligible key verified it
    SignatureVerificationFailed,
}

impl OutcomeError {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeError::NoTokenFound => "no token found",
            OutcomeError::SignatureVerificationFailed => "signature verification failed",
        }
    }
}

impl fmt::Display for OutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OutcomeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Result of extracting and verifying a token.
///
/// Only the constructors below can build one, which keeps the invariants:
/// a valid outcome always has a token and no error, and a missing token
/// always means nothing token-shaped was in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<OutcomeError>,
}

impl VerificationOutcome {
    pub fn verified(token: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            token: Some(token.into()),
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            is_valid: false,
            token: None,
            error: Some(OutcomeError::NoTokenFound),
        }
    }

    pub fn rejected(token: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            token: Some(token.into()),
            error: Some(OutcomeError::SignatureVerificationFailed),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn error(&self) -> Option<OutcomeError> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_serializes_without_error() {
        let json = serde_json::to_value(VerificationOutcome::verified("a.b.c")).unwrap();
        assert_eq!(json, serde_json::json!({ "isValid": true, "token": "a.b.c" }));
    }

    #[test]
    fn not_found_omits_token() {
        let outcome = VerificationOutcome::not_found();
        assert!(!outcome.is_valid());
        assert_eq!(outcome.token(), None);

        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json, serde_json::json!({ "isValid": false, "error": "no token found" }));
    }

    #[test]
    fn rejected_keeps_token() {
        let outcome = VerificationOutcome::rejected("a.b.c");
        assert_eq!(outcome.token(), Some("a.b.c"));
        assert_eq!(outcome.error(), Some(OutcomeError::SignatureVerificationFailed));

        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["error"], "signature verification failed");
    }
}
