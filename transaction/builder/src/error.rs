// Copyright (c) 2019-2024 The Umbra Foundation

use displaydoc::Display;
use umb_crypto_keys::KeyError;
use umb_crypto_ring_signature::Error as RingSignatureError;

/// An error that can occur when constructing a transaction.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TxBuilderError {
    /// No inputs
    NoInputs,

    /// No destinations
    NoDestinations,

    /// A source entry's real output index is out of range
    RealOutputIndexOutOfRange,

    /// A source entry's ring indices must be strictly increasing
    UnsortedRing,

    /// A source entry declares a zero amount
    ZeroAmountSource,

    /// A destination declares a zero amount
    ZeroAmountDestination,

    /**
     * The recomputed one-time key for a source's real output does not match
     * the declared ring member. The entry does not belong to this account,
     * or its transaction public key or output index is wrong.
     */
    RealOutputKeyMismatch,

    /// Summing amounts overflows
    AmountOverflow,

    /// Total destination amount `{0}` exceeds total source amount `{1}`
    InsufficientInputAmount(u64, u64),

    /// Ring signature construction failed: {0}
    RingSignatureFailed(RingSignatureError),

    /// Key: {0}
    KeyError(KeyError),
}

impl From<RingSignatureError> for TxBuilderError {
    fn from(src: RingSignatureError) -> Self {
        TxBuilderError::RingSignatureFailed(src)
    }
}

impl From<KeyError> for TxBuilderError {
    fn from(src: KeyError) -> Self {
        TxBuilderError::KeyError(src)
    }
}
