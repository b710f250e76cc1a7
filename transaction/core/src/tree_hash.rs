// Copyright (c) 2019-2025 The Umbra Foundation

//! The transaction-tree hash committing a block to its transaction set.

use sha2::{Digest, Sha256};

/// The hash of nothing: the tree root of an empty transaction set.
pub const NULL_HASH: [u8; 32] = [0u8; 32];

/// Compute the binary merkle root over an ordered list of transaction
/// hashes, base transaction first.
///
/// Zero hashes produce [`NULL_HASH`]; a single hash is its own root. At each
/// level hashes are paired left-to-right and an odd trailing hash is paired
/// with itself, so every node recomputes the identical root for the
/// identical ordered set.
pub fn tx_tree_hash(tx_hashes: &[[u8; 32]]) -> [u8; 32] {
    match tx_hashes.len() {
        0 => NULL_HASH,
        1 => tx_hashes[0],
        _ => {
            let mut level: Vec<[u8; 32]> = tx_hashes.to_vec();
            while level.len() > 1 {
                level = level
                    .chunks(2)
                    .map(|pair| {
                        let left = &pair[0];
                        let right = pair.get(1).unwrap_or(&pair[0]);
                        hash_pair(left, right)
                    })
                    .collect();
            }
            level[0]
        }
    }
}

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
