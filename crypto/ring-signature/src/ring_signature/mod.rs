// Copyright (c) 2019-2025 The Umbra Foundation

//! Linkable ring signatures and key images.

mod error;
mod key_image;
mod lsag;

pub use self::{error::Error, key_image::KeyImage, lsag::RingSignature};

use crate::domain_separators::HASH_TO_POINT_DOMAIN_TAG;
use blake2::{Blake2b512, Digest};
use curve25519_dalek::ristretto::RistrettoPoint;
use umb_crypto_keys::RistrettoPublic;

/// Map a public key to a point in the ristretto group.
///
/// The preimage of the resulting point is unknown, so it can serve as an
/// independent generator: key images computed against it cannot be related
/// back to the basepoint by any party.
pub fn hash_to_point(ristretto_public: &RistrettoPublic) -> RistrettoPoint {
    RistrettoPoint::from_hash(
        Blake2b512::new()
            .chain_update(HASH_TO_POINT_DOMAIN_TAG)
            .chain_update(ristretto_public.to_bytes()),
    )
}
