// Copyright (c) 2019-2024 The Umbra Foundation

#![allow(non_snake_case)]

use super::{hash_to_point, Error};
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use hex_fmt::HexFmt;
use serde::{Deserialize, Serialize};
use umb_crypto_keys::{RistrettoPrivate, RistrettoPublic};
use zeroize::Zeroize;

/// The "image" of a private key `x`: `I = x * Hp(x * G) = x * Hp(P)`.
///
/// Deterministic in `x`, but cannot be linked back to `P` by anyone who does
/// not know `x`. Every spend publishes the key image of the output it
/// consumes; a repeated image is a double-spend.
#[derive(Clone, Copy, Deserialize, Serialize)]
pub struct KeyImage {
    /// The curve point corresponding to the key image.
    pub point: CompressedRistretto,
}

impl KeyImage {
    /// View the underlying `CompressedRistretto` as an array of bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.point.as_bytes()
    }

    /// Copies `self` into a new Vec.
    pub fn to_vec(&self) -> Vec<u8> {
        self.point.as_bytes().to_vec()
    }
}

impl From<&RistrettoPrivate> for KeyImage {
    fn from(x: &RistrettoPrivate) -> Self {
        let P = RistrettoPublic::from(x);
        let Hp = hash_to_point(&P);
        let point = x.as_ref() * Hp;
        KeyImage {
            point: point.compress(),
        }
    }
}

// Many tests use this
impl From<u64> for KeyImage {
    fn from(n: u64) -> Self {
        let private_key = RistrettoPrivate::from(Scalar::from(n));
        Self::from(&private_key)
    }
}

impl Default for KeyImage {
    fn default() -> Self {
        Self {
            point: CompressedRistretto([0u8; 32]),
        }
    }
}

impl From<[u8; 32]> for KeyImage {
    fn from(src: [u8; 32]) -> Self {
        Self {
            point: CompressedRistretto(src),
        }
    }
}

impl TryFrom<&[u8]> for KeyImage {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 32] = src
            .try_into()
            .map_err(|_| Error::LengthMismatch(src.len(), 32))?;
        Ok(Self::from(*bytes))
    }
}

impl AsRef<CompressedRistretto> for KeyImage {
    fn as_ref(&self) -> &CompressedRistretto {
        &self.point
    }
}

impl AsRef<[u8; 32]> for KeyImage {
    fn as_ref(&self) -> &[u8; 32] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for KeyImage {
    fn as_ref(&self) -> &[u8] {
        &self.as_bytes()[..]
    }
}

impl Zeroize for KeyImage {
    fn zeroize(&mut self) {
        self.point.0.zeroize();
    }
}

impl PartialEq for KeyImage {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for KeyImage {}

impl PartialOrd for KeyImage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyImage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for KeyImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl fmt::Debug for KeyImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyImage({})", HexFmt(self.as_bytes()))
    }
}

impl fmt::Display for KeyImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HexFmt(self.as_bytes()))
    }
}
