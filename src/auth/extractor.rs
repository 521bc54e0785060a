// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token extraction from free-form text.
//!
//! Hosts embed the token in user-supplied text (a form field, a pasted
//! message), so the token may be surrounded by arbitrary content:
//!
//! ```rust
//! use relational_jwt_verifier::auth::extractor::extract_token_str;
//!
//! let found = extract_token_str("my token is aaa.bbb.ccc, thanks");
//! assert_eq!(found, Some("aaa.bbb.ccc"));
//! ```
//!
//! This is a pattern match, not a JWT parser: the leftmost run of three
//! dot-joined URL-safe segments wins, and a fourth segment is left behind.

use std::sync::LazyLock;

use regex::Regex;

/// Three dot-separated segments over the unreserved URL-safe alphabet.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+")
        .unwrap_or_else(|e| unreachable!("token pattern is a valid literal: {e}"))
});

/// Extract the first token-shaped substring, if any.
///
/// `None` input is treated the same as text without a token.
pub fn extract_token(input: Option<&str>) -> Option<String> {
    input.and_then(extract_token_str).map(str::to_owned)
}

/// Borrowing form of [`extract_token`].
pub fn extract_token_str(input: &str) -> Option<&str> {
    TOKEN_PATTERN.find(input).map(|m| m.as_str())
}
