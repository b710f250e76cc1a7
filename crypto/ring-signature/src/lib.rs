// Copyright (c) 2019-2025 The Umbra Foundation

//! One-time output keys, key images, and linkable ring signatures.
//!
//! These are the cryptographic pieces of Umbra's privacy model:
//!
//! - [`onetime_keys`] derives the per-output stealth keys that hide the
//!   recipient of a payment.
//! - [`KeyImage`] is the deterministic fingerprint of a spent output, used to
//!   detect double-spends without revealing which output was spent.
//! - [`RingSignature`] proves that the signer owns one member of a declared
//!   ring of one-time keys, without revealing which one.

#![deny(missing_docs)]

mod domain_separators;
pub mod onetime_keys;
mod ring_signature;

pub use crate::ring_signature::{hash_to_point, Error, KeyImage, RingSignature};

// Re-exported so downstream crates name the scalar type through this crate.
pub use curve25519_dalek::scalar::Scalar;
