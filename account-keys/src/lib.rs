// Copyright (c) 2019-2025 The Umbra Foundation

//! Umbra account keys.
//!
//! An account is a pair of private keys (a, b): the view key `a` identifies
//! owned outputs, the spend key `b` authorizes spending them. Senders are
//! given the public halves (A, B) as a [`PublicAddress`]; the private keys
//! never appear on chain.

#![deny(missing_docs)]

mod account_keys;
mod domain_separators;

pub use crate::account_keys::{AccountKey, PublicAddress};
