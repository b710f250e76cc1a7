// Copyright (c) 2019-2025 The Umbra Foundation

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use umb_crypto_keys::KeyError;
use umb_crypto_ring_signature::Error as RingSignatureError;

/// Type alias for transaction validation results.
pub type TransactionValidationResult<T> = Result<T, TransactionValidationError>;

/// Reasons why a single transaction may fail to be valid.
#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum TransactionValidationError {
    /// A transaction must have at least one input.
    NoInputs,

    /**
     * A transaction must have no more than the maximum allowed number of
     * inputs.
     */
    TooManyInputs,

    /// Must have at least one output.
    NoOutputs,

    /**
     * A transaction must have no more than the maximum allowed number of
     * outputs.
     */
    TooManyOutputs,

    /// The extra field exceeds the maximum allowed size.
    ExtraTooLarge,

    /// Summing the input amounts overflows.
    InputsAmountOverflow,

    /// Summing the output amounts overflows.
    OutputsAmountOverflow,

    /// Total output amount exceeds total input amount.
    OutputsExceedInputs,

    /// An output has a zero amount.
    ZeroAmountOutput,

    /// An output key is not a valid curve point.
    InvalidOutputKey,

    /**
     * A multisignature output's required signature count must be between
     * one and its number of member keys.
     */
    InvalidRequiredSignatureCount,

    /// Only coinbase transactions may carry a base input.
    UnsupportedInputType,

    /// Key images within the transaction must be unique.
    DuplicateKeyImages,

    /// Two multisignature inputs reference the same output.
    DuplicateMultisigInputs,

    /// An input's ring is empty.
    EmptyRing,

    /// Ring member indices must be strictly increasing.
    UnsortedRingMembers,

    /// Ring member offsets overflow when made absolute.
    RingOffsetsOverflow,

    /// One ring of candidate keys must be provided per input.
    RingCountMismatch,

    /// A provided ring does not match its input's ring size.
    RingSizeMismatch,

    /// Each input must have exactly one signature.
    SignatureCountMismatch,

    /// A signature's key image does not match its input's.
    KeyImageMismatch,

    /// Signature validation for multisignature inputs is not supported.
    MultisigSignaturesUnsupported,

    /// Invalid ring signature: `{0}`
    InvalidRingSignature(RingSignatureError),

    /// Public keys must be valid Ristretto points.
    KeyError,
}

impl From<RingSignatureError> for TransactionValidationError {
    fn from(src: RingSignatureError) -> Self {
        Self::InvalidRingSignature(src)
    }
}

impl From<KeyError> for TransactionValidationError {
    fn from(_src: KeyError) -> Self {
        Self::KeyError
    }
}
