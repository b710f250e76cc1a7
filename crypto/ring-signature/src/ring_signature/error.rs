// Copyright (c) 2019-2024 The Umbra Foundation

//! Errors which can occur when signing or verifying a ring signature.

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use umb_crypto_keys::KeyError;

/// An error which can occur when signing or verifying a ring signature.
#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Error {
    /// Incorrect length for array copy, provided `{0}`, required `{1}`.
    LengthMismatch(usize, usize),

    /// Index out of bounds
    IndexOutOfBounds,

    /// Invalid curve point
    InvalidCurvePoint,

    /// The signature was not able to be validated
    InvalidSignature,

    /// Failed to compress/decompress a KeyImage
    InvalidKeyImage,
}

impl From<KeyError> for Error {
    fn from(src: KeyError) -> Self {
        match src {
            KeyError::LengthMismatch(found, expected) => Self::LengthMismatch(found, expected),
            _ => Self::InvalidCurvePoint,
        }
    }
}
