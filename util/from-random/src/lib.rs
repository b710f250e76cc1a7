// Copyright (c) 2019-2024 The Umbra Foundation

//! The `FromRandom` trait: a canonical way to sample a value from a
//! cryptographically secure random number generator.

#![deny(missing_docs)]

use rand_core::{CryptoRng, RngCore};

/// Types which can be sampled from a cryptographic rng.
pub trait FromRandom: Sized {
    /// Sample a fresh value from `rng`.
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;
}

impl FromRandom for [u8; 32] {
    fn from_random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut out = [0u8; 32];
        rng.fill_bytes(&mut out);
        out
    }
}
