// Copyright (c) 2019-2025 The Umbra Foundation

//! The transaction extra field.
//!
//! Extra is a byte stream of tagged records. Today it carries the
//! transaction public key, which every output derivation hangs off, and an
//! optional payment id wrapped in a nonce record. Parsing is strict: a
//! truncated or unknown record rejects the whole field, because a scanner
//! that silently skipped bytes could be steered past the real records.

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use umb_crypto_keys::CompressedRistrettoPublic;

/// Record tag: zero padding to the end of the field.
pub const TX_EXTRA_TAG_PADDING: u8 = 0x00;

/// Record tag: the 32-byte transaction public key.
pub const TX_EXTRA_TAG_PUBLIC_KEY: u8 = 0x01;

/// Record tag: a length-prefixed free-form nonce.
pub const TX_EXTRA_TAG_NONCE: u8 = 0x02;

/// First nonce byte introducing a 32-byte payment id.
pub const TX_EXTRA_NONCE_PAYMENT_ID: u8 = 0x00;

/// An error which can occur when parsing the extra field.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ExtraError {
    /// A tagged record extends past the end of the field
    TruncatedRecord,

    /// Padding bytes must all be zero
    MalformedPadding,

    /// Unknown record tag `{0}`
    UnknownTag(u8),

    /// Duplicate record tag `{0}`
    DuplicateTag(u8),
}

/// The parsed contents of an extra field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TxExtra {
    /// The transaction public key, if present.
    pub tx_public_key: Option<CompressedRistrettoPublic>,

    /// The payment id, if a nonce record carries one.
    pub payment_id: Option<[u8; 32]>,
}

impl TxExtra {
    /// Parse an extra byte stream.
    pub fn parse(extra: &[u8]) -> Result<Self, ExtraError> {
        let mut result = TxExtra::default();
        let mut cursor = 0usize;

        while cursor < extra.len() {
            let tag = extra[cursor];
            cursor += 1;

            match tag {
                TX_EXTRA_TAG_PADDING => {
                    // Padding runs to the end of the field.
                    if extra[cursor..].iter().any(|byte| *byte != 0) {
                        return Err(ExtraError::MalformedPadding);
                    }
                    cursor = extra.len();
                }
                TX_EXTRA_TAG_PUBLIC_KEY => {
                    if result.tx_public_key.is_some() {
                        return Err(ExtraError::DuplicateTag(tag));
                    }
                    if extra.len() < cursor + 32 {
                        return Err(ExtraError::TruncatedRecord);
                    }
                    let mut bytes = [0u8; 32];
                    bytes.copy_from_slice(&extra[cursor..cursor + 32]);
                    result.tx_public_key = Some(CompressedRistrettoPublic::from(bytes));
                    cursor += 32;
                }
                TX_EXTRA_TAG_NONCE => {
                    if extra.len() < cursor + 1 {
                        return Err(ExtraError::TruncatedRecord);
                    }
                    let length = extra[cursor] as usize;
                    cursor += 1;
                    if extra.len() < cursor + length {
                        return Err(ExtraError::TruncatedRecord);
                    }
                    let nonce = &extra[cursor..cursor + length];
                    if nonce.first() == Some(&TX_EXTRA_NONCE_PAYMENT_ID) && nonce.len() == 33 {
                        if result.payment_id.is_some() {
                            return Err(ExtraError::DuplicateTag(tag));
                        }
                        let mut payment_id = [0u8; 32];
                        payment_id.copy_from_slice(&nonce[1..]);
                        result.payment_id = Some(payment_id);
                    }
                    cursor += length;
                }
                unknown => return Err(ExtraError::UnknownTag(unknown)),
            }
        }

        Ok(result)
    }
}

/// Append the transaction public key record.
pub fn add_tx_public_key_to_extra(extra: &mut Vec<u8>, tx_public_key: &CompressedRistrettoPublic) {
    extra.push(TX_EXTRA_TAG_PUBLIC_KEY);
    extra.extend_from_slice(tx_public_key.as_bytes());
}

/// Append a nonce record carrying a 32-byte payment id.
pub fn add_payment_id_to_extra(extra: &mut Vec<u8>, payment_id: &[u8; 32]) {
    extra.push(TX_EXTRA_TAG_NONCE);
    extra.push(33);
    extra.push(TX_EXTRA_NONCE_PAYMENT_ID);
    extra.extend_from_slice(payment_id);
}
