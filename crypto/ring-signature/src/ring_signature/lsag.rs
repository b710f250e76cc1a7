// Copyright (c) 2019-2025 The Umbra Foundation

//! Linkable ring signatures over one-time output keys.
//!
//! A signature over a ring of public keys proves that the signer knows the
//! private key of exactly one ring member, without revealing which, and binds
//! the member's key image into the proof so that spending the same output
//! twice produces the same image.
//!
//! Amounts are not hidden: ring members are outputs of the same declared
//! denomination, so no commitment component is carried.

#![allow(non_snake_case)]

use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT, ristretto::RistrettoPoint, scalar::Scalar,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use umb_crypto_keys::{RistrettoPrivate, RistrettoPublic};

use crate::{
    domain_separators::{RING_DIGEST_DOMAIN_TAG, RING_ROUND_HASH_DOMAIN_TAG},
    ring_signature::{hash_to_point, Error, KeyImage},
};

/// A linkable ring signature for a ring of one-time public keys.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Zeroize)]
pub struct RingSignature {
    /// The initial challenge `c[0]`.
    pub c_zero: Scalar,

    /// Responses `s[0], s[1], ..., s[ring_size-1]`, one per ring member.
    pub responses: Vec<Scalar>,

    /// Key image "spent" by this signature.
    pub key_image: KeyImage,
}

impl RingSignature {
    /// Sign `message` as the owner of ring member `real_index`.
    ///
    /// # Arguments
    /// * `message` - Message to be signed, normally a transaction prefix hash.
    /// * `ring` - The ring of candidate one-time public keys.
    /// * `real_index` - The index in the ring of the real input.
    /// * `onetime_private_key` - The real input's private key.
    /// * `rng` - Cryptographic RNG.
    pub fn sign<R: RngCore + CryptoRng>(
        message: &[u8],
        ring: &[RistrettoPublic],
        real_index: usize,
        onetime_private_key: &RistrettoPrivate,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let ring_size = ring.len();

        if ring_size == 0 {
            return Err(Error::IndexOutOfBounds);
        }

        if real_index >= ring_size {
            return Err(Error::IndexOutOfBounds);
        }

        let G = RISTRETTO_BASEPOINT_POINT;

        // Secret key for signing
        let x: Scalar = *onetime_private_key.as_ref();
        let real_pubkey = &ring[real_index];

        // Compute key image: I = x * Hp(P)
        let key_image = KeyImage::from(onetime_private_key);
        let I = key_image.point.decompress().ok_or(Error::InvalidKeyImage)?;

        // Digest binding the ring and key image into every challenge
        let ring_digest = compute_ring_digest(ring, &key_image);

        // Initialize responses
        let mut responses: Vec<Scalar> = vec![Scalar::ZERO; ring_size];
        for (i, response) in responses.iter_mut().enumerate() {
            if i != real_index {
                *response = Scalar::random(rng);
            }
        }

        // Random nonce for the real signer
        let alpha = Scalar::random(rng);

        // Compute initial L and R at real_index
        // L = alpha * G
        // R = alpha * Hp(P_real)
        let Hp_real = hash_to_point(real_pubkey);
        let L_init = alpha * G;
        let R_init = alpha * Hp_real;

        // Compute c[real_index + 1]
        let mut challenges: Vec<Scalar> = vec![Scalar::ZERO; ring_size];
        challenges[(real_index + 1) % ring_size] =
            compute_round_hash(message, &ring_digest, &L_init, &R_init);

        // Go around the ring from real_index + 1 back to real_index
        for n in 1..ring_size {
            let i = (real_index + n) % ring_size;
            let next_i = (i + 1) % ring_size;

            let P_i = &ring[i];
            let Hp_i = hash_to_point(P_i);

            let c_i = challenges[i];
            let s_i = responses[i];

            // L = s * G + c * P
            let L_i = s_i * G + c_i * P_i.as_ref();

            // R = s * Hp(P) + c * I
            let R_i = s_i * Hp_i + c_i * I;

            challenges[next_i] = compute_round_hash(message, &ring_digest, &L_i, &R_i);
        }

        // Close the loop: compute s[real_index]
        // s = alpha - c * x
        let c_real = challenges[real_index];
        responses[real_index] = alpha - c_real * x;

        Ok(RingSignature {
            c_zero: challenges[0],
            responses,
            key_image,
        })
    }

    /// Verify this signature over `message` against `ring`.
    pub fn verify(&self, message: &[u8], ring: &[RistrettoPublic]) -> Result<(), Error> {
        let ring_size = ring.len();

        if ring_size == 0 {
            return Err(Error::IndexOutOfBounds);
        }

        if self.responses.len() != ring_size {
            return Err(Error::LengthMismatch(ring_size, self.responses.len()));
        }

        let G = RISTRETTO_BASEPOINT_POINT;

        // Decompress key image
        let I = self
            .key_image
            .point
            .decompress()
            .ok_or(Error::InvalidKeyImage)?;

        let ring_digest = compute_ring_digest(ring, &self.key_image);

        // Walk the ring and recompute each challenge
        let mut c = self.c_zero;

        for (P_i, s_i) in ring.iter().zip(self.responses.iter()) {
            let Hp_i = hash_to_point(P_i);

            // L = s * G + c * P
            let L_i = s_i * G + c * P_i.as_ref();

            // R = s * Hp(P) + c * I
            let R_i = s_i * Hp_i + c * I;

            c = compute_round_hash(message, &ring_digest, &L_i, &R_i);
        }

        // Check that we closed the loop
        if c == self.c_zero {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

/// Digest the ring and key image.
///
/// Mixed into every round hash so the challenges commit to the exact ring
/// ordering and the claimed key image, not only to the L/R points.
fn compute_ring_digest(ring: &[RistrettoPublic], key_image: &KeyImage) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(RING_DIGEST_DOMAIN_TAG);
    for member in ring {
        hasher.update(member.to_bytes());
    }
    hasher.update(key_image.as_bytes());

    let mut digest = [0u8; 64];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Compute the round hash for challenge derivation.
fn compute_round_hash(
    message: &[u8],
    ring_digest: &[u8; 64],
    L: &RistrettoPoint,
    R: &RistrettoPoint,
) -> Scalar {
    let mut hasher = Blake2b512::new();
    hasher.update(RING_ROUND_HASH_DOMAIN_TAG);
    hasher.update(ring_digest);
    hasher.update(message);
    hasher.update(L.compress().as_bytes());
    hasher.update(R.compress().as_bytes());
    Scalar::from_hash(hasher)
}

#[cfg(test)]
mod lsag_tests {
    use super::*;
    use proptest::prelude::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::{RngCore, SeedableRng};
    use umb_util_from_random::FromRandom;

    #[derive(Clone)]
    struct RingSignatureTestParams {
        message: [u8; 32],
        ring: Vec<RistrettoPublic>,
        real_index: usize,
        onetime_private_key: RistrettoPrivate,
    }

    impl RingSignatureTestParams {
        fn random<RNG: RngCore + CryptoRng>(num_mixins: usize, rng: &mut RNG) -> Self {
            let mut message = [0u8; 32];
            rng.fill_bytes(&mut message);

            let mut ring: Vec<RistrettoPublic> = (0..num_mixins)
                .map(|_| RistrettoPublic::from_random(rng))
                .collect();

            // The real input
            let onetime_private_key = RistrettoPrivate::from_random(rng);
            let real_index = rng.next_u64() as usize % (num_mixins + 1);
            ring.insert(real_index, RistrettoPublic::from(&onetime_private_key));
            assert_eq!(ring.len(), num_mixins + 1);

            Self {
                message,
                ring,
                real_index,
                onetime_private_key,
            }
        }

        fn sign<RNG: RngCore + CryptoRng>(&self, rng: &mut RNG) -> Result<RingSignature, Error> {
            RingSignature::sign(
                &self.message,
                &self.ring,
                self.real_index,
                &self.onetime_private_key,
                rng,
            )
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn test_sign_produces_one_response_per_ring_member(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();
            assert_eq!(signature.responses.len(), num_mixins + 1);
        }

        #[test]
        fn test_sign_produces_correct_key_image(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();
            assert_eq!(
                signature.key_image,
                KeyImage::from(&params.onetime_private_key)
            );
        }

        #[test]
        fn test_verify_accepts_valid_signature(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();
            assert!(signature.verify(&params.message, &params.ring).is_ok());
        }

        #[test]
        fn test_verify_rejects_wrong_message(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();

            let mut wrong_message = [0u8; 32];
            rng.fill_bytes(&mut wrong_message);

            match signature.verify(&wrong_message, &params.ring) {
                Err(Error::InvalidSignature) => {}
                _ => panic!("Should reject wrong message"),
            }
        }

        #[test]
        fn test_verify_rejects_modified_ring_member(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();

            let mut modified_ring = params.ring.clone();
            let victim = rng.next_u64() as usize % modified_ring.len();
            modified_ring[victim] = RistrettoPublic::from_random(&mut rng);

            match signature.verify(&params.message, &modified_ring) {
                Err(Error::InvalidSignature) => {}
                _ => panic!("Should reject modified ring"),
            }
        }

        #[test]
        fn test_verify_rejects_modified_key_image(
            num_mixins in 1..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let mut signature = params.sign(&mut rng).unwrap();
            signature.key_image = KeyImage::from(rng.next_u64());

            match signature.verify(&params.message, &params.ring) {
                Err(Error::InvalidSignature) => {}
                _ => panic!("Should reject modified key image"),
            }
        }

        #[test]
        fn test_verify_rejects_reordered_ring(
            num_mixins in 2..17usize,
            seed in any::<[u8; 32]>(),
        ) {
            let mut rng: ChaCha20Rng = SeedableRng::from_seed(seed);
            let params = RingSignatureTestParams::random(num_mixins, &mut rng);

            let signature = params.sign(&mut rng).unwrap();

            let mut reordered_ring = params.ring.clone();
            reordered_ring.swap(0, 1);

            match signature.verify(&params.message, &reordered_ring) {
                Err(Error::InvalidSignature) => {}
                _ => panic!("Should reject reordered ring"),
            }
        }
    }

    #[test]
    fn test_sign_empty_ring() {
        let mut rng = rand_core::OsRng;
        let onetime_private_key = RistrettoPrivate::from_random(&mut rng);

        match RingSignature::sign(b"message", &[], 0, &onetime_private_key, &mut rng) {
            Err(Error::IndexOutOfBounds) => {}
            _ => panic!("Should fail with IndexOutOfBounds"),
        }
    }

    #[test]
    fn test_sign_index_out_of_bounds() {
        let mut rng = rand_core::OsRng;
        let params = RingSignatureTestParams::random(5, &mut rng);

        let result = RingSignature::sign(
            &params.message,
            &params.ring,
            100,
            &params.onetime_private_key,
            &mut rng,
        );

        match result {
            Err(Error::IndexOutOfBounds) => {}
            _ => panic!("Should fail with IndexOutOfBounds"),
        }
    }

    #[test]
    fn test_verify_response_count_mismatch() {
        let mut rng = rand_core::OsRng;
        let params = RingSignatureTestParams::random(5, &mut rng);

        let mut signature = params.sign(&mut rng).unwrap();
        signature.responses.pop();

        match signature.verify(&params.message, &params.ring) {
            Err(Error::LengthMismatch(6, 5)) => {}
            other => panic!("Should fail with LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_ring_of_one_signs_and_verifies() {
        let mut rng = rand_core::OsRng;
        let onetime_private_key = RistrettoPrivate::from_random(&mut rng);
        let ring = vec![RistrettoPublic::from(&onetime_private_key)];

        let signature =
            RingSignature::sign(b"solo", &ring, 0, &onetime_private_key, &mut rng).unwrap();
        assert!(signature.verify(b"solo", &ring).is_ok());
    }
}
