// Copyright (c) 2019-2024 The Umbra Foundation

//! Domain separator tags for the hashes used by this crate.
//!
//! Every hash that feeds curve arithmetic is prefixed with one of these tags
//! so that a digest produced in one context can never be replayed in another.

/// Tag for the hash-to-point map used by key images.
pub const HASH_TO_POINT_DOMAIN_TAG: &str = "umb_hash_to_point";

/// Tag for the scalar tying an output's index to the shared secret.
pub const ONETIME_DERIVATION_DOMAIN_TAG: &str = "umb_onetime_derivation";

/// Tag for the digest binding a ring and key image into every challenge.
pub const RING_DIGEST_DOMAIN_TAG: &str = "umb_ring_sig_ring";

/// Tag for the per-round challenge hash of the ring signature.
pub const RING_ROUND_HASH_DOMAIN_TAG: &str = "umb_ring_sig_round";
