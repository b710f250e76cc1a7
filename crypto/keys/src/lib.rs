// Copyright (c) 2019-2025 The Umbra Foundation

//! Umbra key types.
//!
//! The transaction engine works over the Ristretto group of curve25519.
//! This crate wraps the `curve25519-dalek` primitives into the key types the
//! rest of the workspace uses: private scalars, public points, and the
//! compressed (wire) form of public points. Compressed keys are untrusted
//! bytes until decompressed; decompression fails closed on a malformed point.

#![deny(missing_docs)]

mod error;
mod ristretto;

pub use crate::{
    error::KeyError,
    ristretto::{CompressedRistrettoPublic, KeyPair, RistrettoPrivate, RistrettoPublic},
};
