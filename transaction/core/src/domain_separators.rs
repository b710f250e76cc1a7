// Copyright (c) 2019-2024 The Umbra Foundation

//! Domain separator tags for transaction hashing.

/// Tag for the transaction prefix hash, the message ring signatures sign.
pub const TX_PREFIX_DOMAIN_TAG: &str = "umb_tx_prefix";

/// Tag for the full transaction hash, including signatures.
pub const TX_DOMAIN_TAG: &str = "umb_tx";
