// Copyright (c) 2019-2025 The Umbra Foundation

//! Transaction validation.

use super::error::{TransactionValidationError, TransactionValidationResult};
use crate::{
    constants::ConsensusLimits,
    offsets::relative_offsets_to_absolute,
    tx::{Tx, TxIn, TxOutTarget, TxPrefix},
};
use std::collections::HashSet;
use umb_crypto_keys::RistrettoPublic;

/// Determines if a standard (non-coinbase) transaction is structurally
/// valid.
///
/// Everything here is a pure function of the transaction bytes and the
/// network limits; signature checks against resolved rings live in
/// [`validate_signatures`], and ledger-dependent checks (spent key images,
/// unlock times) belong to the chain pipeline.
pub fn validate(tx: &Tx, limits: &ConsensusLimits) -> TransactionValidationResult<()> {
    validate_number_of_inputs(&tx.prefix, limits.max_inputs)?;

    validate_number_of_outputs(&tx.prefix, limits.max_outputs)?;

    validate_extra_size(&tx.prefix, limits.max_extra_size)?;

    validate_input_types(&tx.prefix)?;

    validate_outs_valid(&tx.prefix)?;

    validate_money_overflow(&tx.prefix)?;

    validate_ring_members_are_sorted(&tx.prefix)?;

    validate_multisig_inputs_diff(&tx.prefix)?;

    validate_key_images_are_unique(tx)?;

    Ok(())
}

/// The transaction must have at least one input, and no more than the
/// maximum allowed number of inputs.
pub fn validate_number_of_inputs(
    tx_prefix: &TxPrefix,
    maximum_allowed_inputs: u64,
) -> TransactionValidationResult<()> {
    let num_inputs = tx_prefix.inputs.len();

    if num_inputs == 0 {
        return Err(TransactionValidationError::NoInputs);
    }

    if num_inputs > maximum_allowed_inputs as usize {
        return Err(TransactionValidationError::TooManyInputs);
    }

    Ok(())
}

/// The transaction must have at least one output, and no more than the
/// maximum allowed number of outputs.
pub fn validate_number_of_outputs(
    tx_prefix: &TxPrefix,
    maximum_allowed_outputs: u64,
) -> TransactionValidationResult<()> {
    let num_outputs = tx_prefix.outputs.len();

    if num_outputs == 0 {
        return Err(TransactionValidationError::NoOutputs);
    }

    if num_outputs > maximum_allowed_outputs as usize {
        return Err(TransactionValidationError::TooManyOutputs);
    }

    Ok(())
}

/// The extra field must not exceed the network's size limit.
pub fn validate_extra_size(
    tx_prefix: &TxPrefix,
    maximum_extra_size: usize,
) -> TransactionValidationResult<()> {
    if tx_prefix.extra.len() > maximum_extra_size {
        return Err(TransactionValidationError::ExtraTooLarge);
    }
    Ok(())
}

/// Every input must be a variant a standard transaction may carry: key or
/// multisignature. Base inputs mint coins and appear only in coinbase
/// transactions, which the block pipeline validates separately.
pub fn validate_input_types(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    for input in &tx_prefix.inputs {
        match input {
            TxIn::Key(_) | TxIn::Multisig(_) => {}
            TxIn::Base(_) => return Err(TransactionValidationError::UnsupportedInputType),
        }
    }
    Ok(())
}

/// Every output must carry a nonzero amount and a well-formed target.
///
/// Key outputs must hold a decodable curve point; multisignature outputs
/// must require between one and all of their member keys, each of which
/// must decode.
pub fn validate_outs_valid(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    for output in &tx_prefix.outputs {
        if output.amount == 0 {
            return Err(TransactionValidationError::ZeroAmountOutput);
        }

        match &output.target {
            TxOutTarget::Key(key_output) => {
                if key_output.key.decompress().is_err() {
                    return Err(TransactionValidationError::InvalidOutputKey);
                }
            }
            TxOutTarget::Multisig(multisig) => {
                let required = multisig.required_signature_count as usize;
                if required == 0 || required > multisig.keys.len() {
                    return Err(TransactionValidationError::InvalidRequiredSignatureCount);
                }
                for key in &multisig.keys {
                    if key.decompress().is_err() {
                        return Err(TransactionValidationError::InvalidOutputKey);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Summing the input amounts must not overflow.
pub fn validate_inputs_overflow(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    tx_prefix
        .inputs_amount()
        .map(|_| ())
        .ok_or(TransactionValidationError::InputsAmountOverflow)
}

/// Summing the output amounts must not overflow.
pub fn validate_outs_overflow(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    tx_prefix
        .outputs_amount()
        .map(|_| ())
        .ok_or(TransactionValidationError::OutputsAmountOverflow)
}

/// Neither amount sum may overflow, and outputs must not exceed inputs
/// (the difference is the fee, which cannot be negative).
pub fn validate_money_overflow(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    validate_inputs_overflow(tx_prefix)?;
    validate_outs_overflow(tx_prefix)?;

    let inputs = tx_prefix
        .inputs_amount()
        .ok_or(TransactionValidationError::InputsAmountOverflow)?;
    let outputs = tx_prefix
        .outputs_amount()
        .ok_or(TransactionValidationError::OutputsAmountOverflow)?;
    if outputs > inputs {
        return Err(TransactionValidationError::OutputsExceedInputs);
    }

    Ok(())
}

/// Each key input's ring must be non-empty and its decoded global indices
/// strictly increasing (which also rules out duplicate ring members).
pub fn validate_ring_members_are_sorted(
    tx_prefix: &TxPrefix,
) -> TransactionValidationResult<()> {
    for input in &tx_prefix.inputs {
        if let TxIn::Key(key_input) = input {
            if key_input.output_offsets.is_empty() {
                return Err(TransactionValidationError::EmptyRing);
            }
            let absolute = relative_offsets_to_absolute(&key_input.output_offsets)
                .ok_or(TransactionValidationError::RingOffsetsOverflow)?;
            if !absolute.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(TransactionValidationError::UnsortedRingMembers);
            }
        }
    }
    Ok(())
}

/// No two multisignature inputs may reference the same output.
pub fn validate_multisig_inputs_diff(tx_prefix: &TxPrefix) -> TransactionValidationResult<()> {
    let mut seen = HashSet::new();
    for input in &tx_prefix.inputs {
        if let TxIn::Multisig(multisig) = input {
            if !seen.insert((multisig.amount, multisig.output_index)) {
                return Err(TransactionValidationError::DuplicateMultisigInputs);
            }
        }
    }
    Ok(())
}

/// All key images within the transaction must be unique.
pub fn validate_key_images_are_unique(tx: &Tx) -> TransactionValidationResult<()> {
    let mut seen = HashSet::new();
    for key_image in tx.key_images() {
        if !seen.insert(key_image) {
            return Err(TransactionValidationError::DuplicateKeyImages);
        }
    }
    Ok(())
}

/// Verify the ring signature of every input against the resolved rings.
///
/// `rings[i]` holds the decompressed public keys of input `i`'s ring
/// members, in stored (ascending global index) order — the same order the
/// signer used, or verification reconstructs a different message and fails.
///
/// A valid signature set implies the prefix has not been modified, the
/// signer owns one member of each ring, and each key image is bound to its
/// ring. Multisignature spends are authorized by their own quorum scheme,
/// not by this engine, so their presence fails closed here.
pub fn validate_signatures(
    tx: &Tx,
    rings: &[Vec<RistrettoPublic>],
) -> TransactionValidationResult<()> {
    if tx.signatures.len() != tx.prefix.inputs.len() {
        return Err(TransactionValidationError::SignatureCountMismatch);
    }
    if rings.len() != tx.prefix.inputs.len() {
        return Err(TransactionValidationError::RingCountMismatch);
    }

    let prefix_hash = tx.prefix.hash();

    for ((input, signature), ring) in tx
        .prefix
        .inputs
        .iter()
        .zip(tx.signatures.iter())
        .zip(rings.iter())
    {
        match input {
            TxIn::Key(key_input) => {
                if ring.len() != key_input.output_offsets.len() {
                    return Err(TransactionValidationError::RingSizeMismatch);
                }
                if signature.key_image != key_input.key_image {
                    return Err(TransactionValidationError::KeyImageMismatch);
                }
                signature.verify(&prefix_hash, ring)?;
            }
            TxIn::Multisig(_) => {
                return Err(TransactionValidationError::MultisigSignaturesUnsupported)
            }
            TxIn::Base(_) => return Err(TransactionValidationError::UnsupportedInputType),
        }
    }

    Ok(())
}

// NOTE: Unit tests for every validation function appear in
// transaction/core/tests/validation.rs, alongside the end-to-end signature
// checks that need hand-built rings.
