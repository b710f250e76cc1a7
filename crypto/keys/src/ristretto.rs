// Copyright (c) 2019-2025 The Umbra Foundation

//! Ristretto key types.

use crate::KeyError;
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use hex_fmt::HexFmt;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use umb_util_from_random::FromRandom;
use zeroize::Zeroize;

/// A Ristretto private key: a scalar in the curve25519 scalar field.
///
/// Zeroized on drop. The `Debug` impl is redacted so secret material never
/// reaches a log line by accident.
#[derive(Clone, Deserialize, Serialize, Zeroize)]
#[zeroize(drop)]
pub struct RistrettoPrivate(Scalar);

impl RistrettoPrivate {
    /// The canonical 32-byte little-endian encoding of the scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

impl AsRef<Scalar> for RistrettoPrivate {
    fn as_ref(&self) -> &Scalar {
        &self.0
    }
}

impl From<Scalar> for RistrettoPrivate {
    fn from(scalar: Scalar) -> Self {
        Self(scalar)
    }
}

impl TryFrom<&[u8; 32]> for RistrettoPrivate {
    type Error = KeyError;

    fn try_from(src: &[u8; 32]) -> Result<Self, KeyError> {
        let scalar: Option<Scalar> = Scalar::from_canonical_bytes(*src).into();
        scalar.map(Self).ok_or(KeyError::InvalidScalar)
    }
}

impl TryFrom<&[u8]> for RistrettoPrivate {
    type Error = KeyError;

    fn try_from(src: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; 32] = src
            .try_into()
            .map_err(|_| KeyError::LengthMismatch(src.len(), 32))?;
        Self::try_from(bytes)
    }
}

impl FromRandom for RistrettoPrivate {
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(Scalar::random(rng))
    }
}

impl fmt::Debug for RistrettoPrivate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RistrettoPrivate(<redacted>)")
    }
}

/// A Ristretto public key: a point on the curve.
///
/// Always a valid group element; untrusted bytes enter through
/// [`CompressedRistrettoPublic`] and are checked at decompression.
#[derive(Clone, Copy, Deserialize, Eq, PartialEq, Serialize, Zeroize)]
pub struct RistrettoPublic(RistrettoPoint);

impl RistrettoPublic {
    /// The compressed 32-byte encoding of the point.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }
}

impl AsRef<RistrettoPoint> for RistrettoPublic {
    fn as_ref(&self) -> &RistrettoPoint {
        &self.0
    }
}

impl From<RistrettoPoint> for RistrettoPublic {
    fn from(point: RistrettoPoint) -> Self {
        Self(point)
    }
}

impl From<&RistrettoPrivate> for RistrettoPublic {
    fn from(private: &RistrettoPrivate) -> Self {
        Self(RISTRETTO_BASEPOINT_TABLE * private.as_ref())
    }
}

impl TryFrom<&[u8; 32]> for RistrettoPublic {
    type Error = KeyError;

    fn try_from(src: &[u8; 32]) -> Result<Self, KeyError> {
        CompressedRistretto(*src)
            .decompress()
            .map(Self)
            .ok_or(KeyError::InvalidCurvePoint)
    }
}

impl TryFrom<&[u8]> for RistrettoPublic {
    type Error = KeyError;

    fn try_from(src: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; 32] = src
            .try_into()
            .map_err(|_| KeyError::LengthMismatch(src.len(), 32))?;
        Self::try_from(bytes)
    }
}

impl FromRandom for RistrettoPublic {
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from(&RistrettoPrivate::from_random(rng))
    }
}

// Hash and Ord go through the compressed encoding so that keys sort and
// deduplicate identically on every node.
impl Hash for RistrettoPublic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

impl PartialOrd for RistrettoPublic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RistrettoPublic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl fmt::Debug for RistrettoPublic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RistrettoPublic({})", HexFmt(self.to_bytes()))
    }
}

impl fmt::Display for RistrettoPublic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HexFmt(self.to_bytes()))
    }
}

/// The compressed (wire) form of a Ristretto public key.
///
/// This is plain bytes: it may or may not decode to a point. Consumers must
/// call [`CompressedRistrettoPublic::decompress`] before doing curve
/// arithmetic, and treat failure as a rejection of the containing object.
#[derive(Clone, Copy, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CompressedRistrettoPublic(CompressedRistretto);

impl CompressedRistrettoPublic {
    /// View the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Decompress into a usable public key, failing on a malformed point.
    pub fn decompress(&self) -> Result<RistrettoPublic, KeyError> {
        self.0
            .decompress()
            .map(RistrettoPublic::from)
            .ok_or(KeyError::InvalidCurvePoint)
    }
}

impl AsRef<[u8; 32]> for CompressedRistrettoPublic {
    fn as_ref(&self) -> &[u8; 32] {
        self.as_bytes()
    }
}

impl From<[u8; 32]> for CompressedRistrettoPublic {
    fn from(src: [u8; 32]) -> Self {
        Self(CompressedRistretto(src))
    }
}

impl From<&RistrettoPublic> for CompressedRistrettoPublic {
    fn from(src: &RistrettoPublic) -> Self {
        Self(src.as_ref().compress())
    }
}

impl From<RistrettoPublic> for CompressedRistrettoPublic {
    fn from(src: RistrettoPublic) -> Self {
        Self::from(&src)
    }
}

impl TryFrom<&[u8]> for CompressedRistrettoPublic {
    type Error = KeyError;

    fn try_from(src: &[u8]) -> Result<Self, KeyError> {
        let bytes: &[u8; 32] = src
            .try_into()
            .map_err(|_| KeyError::LengthMismatch(src.len(), 32))?;
        Ok(Self::from(*bytes))
    }
}

impl FromRandom for CompressedRistrettoPublic {
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from(RistrettoPublic::from_random(rng))
    }
}

impl PartialOrd for CompressedRistrettoPublic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompressedRistrettoPublic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl fmt::Debug for CompressedRistrettoPublic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CompressedRistrettoPublic({})", HexFmt(self.as_bytes()))
    }
}

impl fmt::Display for CompressedRistrettoPublic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HexFmt(self.as_bytes()))
    }
}

/// A private/public key pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// The public half.
    pub public_key: RistrettoPublic,

    /// The private half.
    pub private_key: RistrettoPrivate,
}

impl KeyPair {
    /// Build the pair corresponding to `private_key`.
    pub fn from_private(private_key: RistrettoPrivate) -> Self {
        Self {
            public_key: RistrettoPublic::from(&private_key),
            private_key,
        }
    }
}

impl FromRandom for KeyPair {
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_private(RistrettoPrivate::from_random(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_public_from_private_round_trip() {
        let private = RistrettoPrivate::from_random(&mut OsRng);
        let public = RistrettoPublic::from(&private);

        let bytes = public.to_bytes();
        let recovered = RistrettoPublic::try_from(&bytes).expect("valid point");
        assert_eq!(public, recovered);
    }

    #[test]
    fn test_compressed_decompress_round_trip() {
        let public = RistrettoPublic::from_random(&mut OsRng);
        let compressed = CompressedRistrettoPublic::from(&public);
        assert_eq!(compressed.decompress().unwrap(), public);
    }

    #[test]
    fn test_bad_point_fails_closed() {
        // Not every 32-byte string is a ristretto point.
        let mut candidates = 0;
        let mut failures = 0;
        for i in 0u8..32 {
            let mut bytes = [0xffu8; 32];
            bytes[0] = i;
            candidates += 1;
            if CompressedRistrettoPublic::from(bytes).decompress().is_err() {
                failures += 1;
            }
        }
        assert!(failures > 0, "no rejection among {candidates} candidates");
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let short = [0u8; 16];
        assert_eq!(
            RistrettoPublic::try_from(&short[..]),
            Err(KeyError::LengthMismatch(16, 32))
        );
    }

    #[test]
    fn test_non_canonical_scalar_is_rejected() {
        // The field order plus one is not a canonical encoding.
        let noncanonical = [0xffu8; 32];
        assert!(RistrettoPrivate::try_from(&noncanonical).is_err());
    }

    #[test]
    fn test_keypair_halves_agree() {
        let pair = KeyPair::from_random(&mut OsRng);
        assert_eq!(pair.public_key, RistrettoPublic::from(&pair.private_key));
    }
}
