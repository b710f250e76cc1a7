// Copyright (c) 2019-2025 The Umbra Foundation

//! Blocks and chain entries.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use umb_transaction_core::{tree_hash::tx_tree_hash, tx::TxIn, Tx};

/// Domain tag for block id hashing.
const BLOCK_ID_DOMAIN_TAG: &str = "umb_block_id";

/// A block: header fields, the coinbase transaction, and the hashes of the
/// other transactions it commits to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Block {
    /// Block format version.
    pub version: u8,

    /// Id of the parent block.
    pub prev_id: [u8; 32],

    /// Creation time, seconds since the epoch.
    pub timestamp: u64,

    /// Proof-of-work nonce.
    pub nonce: u64,

    /// The coinbase transaction minting this block's reward.
    pub base_transaction: Tx,

    /// Hashes of all other transactions in the block, in block order.
    pub transaction_hashes: Vec<[u8; 32]>,
}

impl Block {
    /// The root of the transaction tree: the coinbase hash first, then
    /// every other transaction hash, in block order.
    pub fn tx_tree_root(&self) -> [u8; 32] {
        let mut hashes = Vec::with_capacity(1 + self.transaction_hashes.len());
        hashes.push(self.base_transaction.hash());
        hashes.extend(self.transaction_hashes.iter().copied());
        tx_tree_hash(&hashes)
    }

    /// The block id. Commits to the header fields, the transaction tree
    /// root, and the transaction count, so no transaction can be added,
    /// removed, or reordered without changing the id.
    pub fn id(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(BLOCK_ID_DOMAIN_TAG);
        hasher.update([self.version]);
        hasher.update(self.prev_id);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(self.tx_tree_root());
        hasher.update((1 + self.transaction_hashes.len() as u64).to_le_bytes());
        hasher.finalize().into()
    }

    /// The block's height, read from the coinbase input.
    ///
    /// `None` if the coinbase is malformed (its first input is not a base
    /// input).
    pub fn height(&self) -> Option<u64> {
        match self.base_transaction.prefix.inputs.first() {
            Some(TxIn::Base(base)) => Some(base.block_index),
            _ => None,
        }
    }
}

/// A block as stored in the chain, together with its cumulative context.
///
/// `height` and `cumulative_difficulty` are monotonic along any valid
/// chain.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BlockEntry {
    /// The block itself.
    pub block: Block,

    /// Height of the block in the chain.
    pub height: u64,

    /// Total serialized size of the chain up to and including this block.
    pub block_cumulative_size: u64,

    /// Total difficulty of the chain up to and including this block.
    pub cumulative_difficulty: u64,

    /// Total coins emitted up to and including this block.
    pub already_generated_coins: u64,

    /// The block's transactions, in block order.
    pub transactions: Vec<Tx>,
}
