// Copyright (c) 2019-2025 The Umbra Foundation

//! Umbra transaction data types, output-ownership scanning, and validation
//! routines.
//!
//! Everything here is deterministic and synchronous: the same transaction
//! bytes produce the same hashes, scan results, and validation verdicts on
//! every node. Network-dependent parameters enter through
//! [`constants::ConsensusLimits`] rather than process-wide state.

#![deny(missing_docs)]

pub mod amount;
pub mod constants;
pub mod domain_separators;
pub mod extra;
pub mod offsets;
pub mod scan;
pub mod tree_hash;
pub mod tx;
pub mod validation;

pub use crate::{
    amount::{decompose_amount_into_digits, DecomposedAmount},
    constants::ConsensusLimits,
    extra::{ExtraError, TxExtra},
    scan::{generate_key_image, is_output_owned, scan_outputs, ScanError, ScanSummary},
    tree_hash::{tx_tree_hash, NULL_HASH},
    tx::{
        BaseInput, KeyInput, KeyOutput, MultisigInput, MultisigOutput, Tx, TxIn, TxOut,
        TxOutTarget, TxPrefix,
    },
};
