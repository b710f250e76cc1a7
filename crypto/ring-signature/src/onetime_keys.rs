// Copyright (c) 2019-2025 The Umbra Foundation

//! One-time (stealth) output keys.
//!
//! # Stealth Address Protocol
//!
//! For a recipient with address (A, B) where A is the view public key and
//! B is the spend public key:
//!
//! **Sender creates:**
//! - Random transaction key `r`, published as `R = r * G`
//! - Shared secret: `D = r * A`
//! - Output key at position `i`: `P = Hs(D ‖ i) * G + B`
//!
//! **Recipient scans:**
//! - Recomputes `D = a * R` where `a` is the view private key
//! - Recomputes `P' = Hs(D ‖ i) * G + B`; if `P' == P` the output is theirs
//!
//! **Recipient spends:**
//! - Recovers the one-time private key: `x = Hs(D ‖ i) + b` where `b` is the
//!   spend private key
//!
//! Both sides arrive at the same `D` from opposite halves of a Diffie-Hellman
//! exchange, so only the sender and the recipient can recognize the output.

use crate::domain_separators::ONETIME_DERIVATION_DOMAIN_TAG;
use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT, ristretto::RistrettoPoint, scalar::Scalar,
};
use umb_crypto_keys::{RistrettoPrivate, RistrettoPublic};
use zeroize::Zeroize;

/// The Diffie-Hellman shared secret between a transaction key and a view key.
///
/// The sender computes it from the recipient's view public key and the
/// transaction private key; the recipient computes it from the transaction
/// public key and their view private key. Both sides produce the same point.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct KeyDerivation(RistrettoPoint);

impl KeyDerivation {
    /// Compute `private * public`.
    pub fn new(public: &RistrettoPublic, private: &RistrettoPrivate) -> Self {
        Self(private.as_ref() * public.as_ref())
    }

    /// The compressed encoding of the shared secret point.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }
}

/// `Hs(derivation ‖ output_index)` — the scalar tying an output's position
/// within its transaction to the shared secret.
fn derivation_to_scalar(derivation: &KeyDerivation, output_index: u64) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(ONETIME_DERIVATION_DOMAIN_TAG);
    hasher.update(derivation.to_bytes());
    hasher.update(output_index.to_le_bytes());
    Scalar::from_hash(hasher)
}

/// The one-time public key of the output at `output_index`:
/// `P = Hs(D ‖ i) * G + B`.
pub fn derive_public_key(
    derivation: &KeyDerivation,
    output_index: u64,
    spend_public_key: &RistrettoPublic,
) -> RistrettoPublic {
    let hs = derivation_to_scalar(derivation, output_index);
    RistrettoPublic::from(hs * RISTRETTO_BASEPOINT_POINT + spend_public_key.as_ref())
}

/// The one-time private key matching [`derive_public_key`]:
/// `x = Hs(D ‖ i) + b`.
pub fn derive_private_key(
    derivation: &KeyDerivation,
    output_index: u64,
    spend_private_key: &RistrettoPrivate,
) -> RistrettoPrivate {
    let hs = derivation_to_scalar(derivation, output_index);
    RistrettoPrivate::from(hs + spend_private_key.as_ref())
}

/// Recover the spend public key a one-time key was derived for:
/// `B' = P - Hs(D ‖ i) * G`.
///
/// A scanner may compare the result against its own spend public key instead
/// of re-deriving the one-time key; the two checks are equivalent.
pub fn underive_public_key(
    derivation: &KeyDerivation,
    output_index: u64,
    onetime_public_key: &RistrettoPublic,
) -> RistrettoPublic {
    let hs = derivation_to_scalar(derivation, output_index);
    RistrettoPublic::from(onetime_public_key.as_ref() - hs * RISTRETTO_BASEPOINT_POINT)
}
