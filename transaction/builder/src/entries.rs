// Copyright (c) 2019-2025 The Umbra Foundation

//! Source and destination entries for transaction construction.

use crate::TxBuilderError;
use serde::{Deserialize, Serialize};
use umb_account_keys::PublicAddress;
use umb_crypto_keys::{CompressedRistrettoPublic, RistrettoPublic};

/// One input-to-be: the real output being spent plus the decoys that will
/// hide it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TxSourceEntry {
    /// Ring members as `(global output index, one-time output key)` pairs,
    /// sorted by strictly increasing global index. The real output is among
    /// them.
    pub ring: Vec<(u64, CompressedRistrettoPublic)>,

    /// Index into `ring` of the real output.
    pub real_output_index: usize,

    /// The transaction public key of the transaction that created the real
    /// output.
    pub real_tx_public_key: RistrettoPublic,

    /// The real output's key index within the transaction that created it.
    pub real_output_index_in_tx: u64,

    /// Value of the real output. Decoys are drawn from the same
    /// denomination bucket.
    pub amount: u64,
}

impl TxSourceEntry {
    /// Check the entry's own invariants; construction fails closed on the
    /// first violated one.
    pub fn validate(&self) -> Result<(), TxBuilderError> {
        if self.real_output_index >= self.ring.len() {
            return Err(TxBuilderError::RealOutputIndexOutOfRange);
        }
        if !self
            .ring
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0)
        {
            return Err(TxBuilderError::UnsortedRing);
        }
        if self.amount == 0 {
            return Err(TxBuilderError::ZeroAmountSource);
        }
        Ok(())
    }
}

/// One output-to-be: an amount and the address to derive its one-time key
/// for.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TxDestinationEntry {
    /// Value of the output.
    pub amount: u64,

    /// The recipient.
    pub address: PublicAddress,
}

impl TxDestinationEntry {
    /// Convenience constructor.
    pub fn new(amount: u64, address: PublicAddress) -> Self {
        Self { amount, address }
    }
}
