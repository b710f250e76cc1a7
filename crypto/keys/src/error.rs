// Copyright (c) 2019-2025 The Umbra Foundation

//! Errors which can occur when handling curve keys.

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// An error which can occur when converting bytes into a key type.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum KeyError {
    /// Incorrect key length, provided `{0}`, required `{1}`
    LengthMismatch(usize, usize),

    /// The bytes do not decode to a valid curve point
    InvalidCurvePoint,

    /// The bytes do not decode to a canonical scalar
    InvalidScalar,
}
