// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IEEE P1363 → ASN.1 DER conversion for ECDSA signatures.
//!
//! JWS carries ECDSA signatures as fixed-width `r ‖ s`. Low-level verifiers
//! expect the X.509 form instead:
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }
//! ```

use base64ct::{Base64UrlUnpadded, Encoding};

use super::error::SignatureError;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// A fixed-width `r ‖ s` signature.
///
/// Always non-empty with an even length, so conversion cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature(Vec<u8>);

impl RawSignature {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SignatureError> {
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return Err(SignatureError::MalformedToken(format!(
                "raw signature must have a non-zero even length, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Decode the third token segment (unpadded URL-safe base64).
    pub fn from_segment(segment: &str) -> Result<Self, SignatureError> {
        let bytes = Base64UrlUnpadded::decode_vec(segment)
            .map_err(|e| SignatureError::MalformedToken(format!("signature segment: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..self.0.len() / 2]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[self.0.len() / 2..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode as a DER `ECDSA-Sig-Value`.
    pub fn to_der(&self) -> Vec<u8> {
        let r = encode_integer(self.r());
        let s = encode_integer(self.s());

        let mut der = Vec::with_capacity(r.len() + s.len() + 4);
        der.push(TAG_SEQUENCE);
        push_length(&mut der, r.len() + s.len());
        der.extend_from_slice(&r);
        der.extend_from_slice(&s);
        der
    }
}

/// Convert raw `r ‖ s` bytes to DER in one step.
pub fn p1363_to_der(raw: &[u8]) -> Result<Vec<u8>, SignatureError> {
    RawSignature::from_bytes(raw.to_vec()).map(|sig| sig.to_der())
}

/// Encode an unsigned big-endian integer as a minimal DER INTEGER.
fn encode_integer(unsigned: &[u8]) -> Vec<u8> {
    // Keep one byte even when the value is zero.
    let first_significant = unsigned
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(unsigned.len().saturating_sub(1));
    let trimmed = unsigned.get(first_significant..).unwrap_or_default();

    let needs_pad = trimmed.first().is_none_or(|&b| b & 0x80 != 0);
    let value_len = trimmed.len() + usize::from(needs_pad);

    let mut out = Vec::with_capacity(value_len + 4);
    out.push(TAG_INTEGER);
    push_length(&mut out, value_len);
    if needs_pad {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// DER definite length: short form below 128, long form otherwise.
fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Read one TLV, returning (tag, value, rest).
    fn read_tlv(input: &[u8]) -> (u8, &[u8], &[u8]) {
        let tag = input[0];
        let (len, header) = if input[1] < 0x80 {
            (input[1] as usize, 2)
        } else {
            let n = (input[1] & 0x7f) as usize;
            let len = input[2..2 + n]
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            (len, 2 + n)
        };
        (tag, &input[header..header + len], &input[header + len..])
    }

    /// Left-pad a DER integer value back to `width` bytes.
    fn to_fixed(value: &[u8], width: usize) -> Vec<u8> {
        let stripped: Vec<u8> = if value.len() > width {
            value[value.len() - width..].to_vec()
        } else {
            value.to_vec()
        };
        let mut out = vec![0u8; width - stripped.len()];
        out.extend_from_slice(&stripped);
        out
    }

    fn assert_round_trips(raw: &[u8]) {
        let der = p1363_to_der(raw).unwrap();
        let (tag, body, rest) = read_tlv(&der);
        assert_eq!(tag, TAG_SEQUENCE);
        assert!(rest.is_empty());

        let (r_tag, r_value, after_r) = read_tlv(body);
        let (s_tag, s_value, after_s) = read_tlv(after_r);
        assert_eq!((r_tag, s_tag), (TAG_INTEGER, TAG_INTEGER));
        assert!(after_s.is_empty());

        for value in [r_value, s_value] {
            assert!(!value.is_empty());
            // Positive and minimal
            assert_eq!(value[0] & 0x80, 0);
            if value.len() > 1 {
                assert!(value[0] != 0 || value[1] & 0x80 != 0);
            }
        }

        let half = raw.len() / 2;
        assert_eq!(to_fixed(r_value, half), raw[..half]);
        assert_eq!(to_fixed(s_value, half), raw[half..]);
    }

    #[test]
    fn pads_high_bit_integers() {
        let mut raw = vec![0x11; 64];
        raw[0] = 0x80;
        raw[32] = 0xff;
        let der = p1363_to_der(&raw).unwrap();

        assert_eq!(der[0], 0x30);
        assert_eq!(der[1], 70);
        assert_eq!(&der[2..5], &[0x02, 33, 0x00]);
        assert_eq!(der[5], 0x80);
        assert_eq!(&der[37..40], &[0x02, 33, 0x00]);
        assert_round_trips(&raw);
    }

    #[test]
    fn strips_redundant_leading_zeros() {
        let mut raw = vec![0x22; 64];
        raw[0] = 0x00;
        raw[1] = 0x00;
        raw[2] = 0x05;
        let der = p1363_to_der(&raw).unwrap();
        assert_eq!(&der[2..5], &[0x02, 30, 0x05]);
        assert_round_trips(&raw);
    }

    #[test]
    fn keeps_one_zero_before_high_bit() {
        let mut raw = vec![0x33; 64];
        raw[0] = 0x00;
        raw[1] = 0x9a;
        let der = p1363_to_der(&raw).unwrap();
        assert_eq!(&der[2..5], &[0x02, 32, 0x00]);
        assert_eq!(der[5], 0x9a);
        assert_round_trips(&raw);
    }

    #[test]
    fn all_zero_integer_encodes_as_single_zero() {
        let mut raw = vec![0u8; 64];
        raw[63] = 0x01;
        let der = p1363_to_der(&raw).unwrap();
        assert_eq!(&der[2..5], &[0x02, 0x01, 0x00]);
        assert_eq!(&der[5..8], &[0x02, 0x01, 0x01]);
        assert_eq!(der[1], 6);
    }

    #[test]
    fn matches_k256_der_encoder() {
        let patterns: [[u8; 2]; 5] = [[0x01, 0x7f], [0x80, 0x00], [0x00, 0xc3], [0x7f, 0xff], [0x00, 0x00]];
        for (i, [a, b]) in patterns.into_iter().enumerate() {
            let mut raw = vec![0x5a; 64];
            raw[0] = a;
            raw[1] = b;
            raw[32] = b;
            raw[33] = a;
            raw[10] = i as u8;

            let reference = k256::ecdsa::Signature::from_slice(&raw).unwrap();
            assert_eq!(
                p1363_to_der(&raw).unwrap(),
                reference.to_der().as_bytes(),
                "pattern {i}"
            );
        }
    }

    #[test]
    fn round_trips_p384_width() {
        let mut raw = vec![0xa5; 96];
        raw[0] = 0x00;
        raw[48] = 0xf0;
        assert_round_trips(&raw);
    }

    #[test]
    fn round_trips_single_byte_integers() {
        assert_round_trips(&[0x00, 0x00]);
        assert_round_trips(&[0x80, 0x7f]);
        assert_round_trips(&[0x01, 0xff]);
    }

    #[test]
    fn uses_long_form_length_for_wide_integers() {
        let raw = vec![0xff; 256];
        let der = p1363_to_der(&raw).unwrap();
        // Each integer: 02 81 81 00 + 128 bytes = 132 bytes
        assert_eq!(&der[..4], &[0x30, 0x82, 0x01, 0x08]);
        assert_eq!(&der[4..8], &[0x02, 0x81, 0x81, 0x00]);
        assert_round_trips(&raw);
    }

    #[test]
    fn rejects_odd_and_empty_input() {
        assert!(matches!(
            p1363_to_der(&[0x01, 0x02, 0x03]),
            Err(SignatureError::MalformedToken(_))
        ));
        assert!(matches!(p1363_to_der(&[]), Err(SignatureError::MalformedToken(_))));
    }

    #[test]
    fn decodes_segment() {
        // 64 bytes of 0xff
        let segment = "_".repeat(85) + "w";
        let sig = RawSignature::from_segment(&segment).unwrap();
        assert_eq!(sig.as_bytes().len(), 64);
        assert_eq!(sig.r(), &[0xff; 32]);
        assert_eq!(sig.s(), &[0xff; 32]);
    }

    #[test]
    fn rejects_non_base64_segment() {
        assert!(RawSignature::from_segment("not base64!").is_err());
    }
}
