// Copyright (c) 2019-2025 The Umbra Foundation

//! Transaction types.
//!
//! Inputs and output targets are sum types; validation dispatches over them
//! by exhaustive match.

use crate::domain_separators::{TX_DOMAIN_TAG, TX_PREFIX_DOMAIN_TAG};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use umb_crypto_keys::CompressedRistrettoPublic;
use umb_crypto_ring_signature::{KeyImage, RingSignature};

/// A coinbase input minting the reward for the block at `block_index`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BaseInput {
    /// Height of the block this input mints the reward for.
    pub block_index: u64,
}

/// An input spending a key output, hidden among ring members.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyInput {
    /// Denomination of the spent output. Ring members share this amount
    /// bucket, so the value itself reveals nothing about which member is
    /// real.
    pub amount: u64,

    /// Global indices of the ring members, relative-encoded: the first entry
    /// is absolute, each later entry is the delta from its predecessor.
    pub output_offsets: Vec<u64>,

    /// Key image of the spent output, the double-spend fingerprint.
    pub key_image: KeyImage,
}

/// An input spending a multisignature output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MultisigInput {
    /// Denomination of the spent output.
    pub amount: u64,

    /// Number of signer approvals carried for this spend.
    pub signature_count: u8,

    /// Global index of the multisignature output being spent.
    pub output_index: u64,
}

/// A transaction input.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TxIn {
    /// Coinbase.
    Base(BaseInput),

    /// Ring-signed spend of a key output.
    Key(KeyInput),

    /// Spend of a multisignature output.
    Multisig(MultisigInput),
}

/// An output claimable by whoever knows the one-time private key.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyOutput {
    /// The one-time (stealth) public key of the output.
    pub key: CompressedRistrettoPublic,
}

/// An output claimable by a quorum of signers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MultisigOutput {
    /// Public keys of the eligible signers.
    pub keys: Vec<CompressedRistrettoPublic>,

    /// How many of `keys` must sign to spend this output.
    pub required_signature_count: u8,
}

/// The claiming condition of an output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TxOutTarget {
    /// A one-time key output.
    Key(KeyOutput),

    /// A multisignature output.
    Multisig(MultisigOutput),
}

/// A transaction output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TxOut {
    /// Value of the output.
    pub amount: u64,

    /// Who may claim it.
    pub target: TxOutTarget,
}

/// Everything in a transaction except the signatures.
///
/// The hash of the prefix is the message each input's ring signature signs,
/// so nothing in here can change without invalidating every signature.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TxPrefix {
    /// Transaction format version.
    pub version: u8,

    /// Block height (or timestamp, by convention) before which the outputs
    /// may not be spent.
    pub unlock_time: u64,

    /// Inputs, in signing order.
    pub inputs: Vec<TxIn>,

    /// Outputs, one per destination, in destination order.
    pub outputs: Vec<TxOut>,

    /// Free-form tagged records; carries the transaction public key and an
    /// optional payment id.
    pub extra: Vec<u8>,
}

/// A complete transaction: prefix plus one ring signature per input.
///
/// `signatures[i]` authorizes `prefix.inputs[i]`; coinbase transactions
/// carry no signatures.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tx {
    /// The signed portion.
    pub prefix: TxPrefix,

    /// One ring signature per input, in input order.
    pub signatures: Vec<RingSignature>,
}

impl Default for TxIn {
    fn default() -> Self {
        Self::Base(BaseInput { block_index: 0 })
    }
}

impl TxIn {
    fn digest_to(&self, hasher: &mut Sha256) {
        match self {
            TxIn::Base(base) => {
                hasher.update([0u8]);
                hasher.update(base.block_index.to_le_bytes());
            }
            TxIn::Key(key_input) => {
                hasher.update([1u8]);
                hasher.update(key_input.amount.to_le_bytes());
                hasher.update((key_input.output_offsets.len() as u64).to_le_bytes());
                for offset in &key_input.output_offsets {
                    hasher.update(offset.to_le_bytes());
                }
                hasher.update(key_input.key_image.as_bytes());
            }
            TxIn::Multisig(multisig) => {
                hasher.update([2u8]);
                hasher.update(multisig.amount.to_le_bytes());
                hasher.update([multisig.signature_count]);
                hasher.update(multisig.output_index.to_le_bytes());
            }
        }
    }
}

impl TxOut {
    fn digest_to(&self, hasher: &mut Sha256) {
        hasher.update(self.amount.to_le_bytes());
        match &self.target {
            TxOutTarget::Key(key_output) => {
                hasher.update([0u8]);
                hasher.update(key_output.key.as_bytes());
            }
            TxOutTarget::Multisig(multisig) => {
                hasher.update([1u8]);
                hasher.update([multisig.required_signature_count]);
                hasher.update((multisig.keys.len() as u64).to_le_bytes());
                for key in &multisig.keys {
                    hasher.update(key.as_bytes());
                }
            }
        }
    }
}

impl TxPrefix {
    /// Hash of the prefix: the message every input signature signs.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(TX_PREFIX_DOMAIN_TAG);
        hasher.update([self.version]);
        hasher.update(self.unlock_time.to_le_bytes());

        hasher.update((self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            input.digest_to(&mut hasher);
        }

        hasher.update((self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            output.digest_to(&mut hasher);
        }

        hasher.update((self.extra.len() as u64).to_le_bytes());
        hasher.update(&self.extra);

        hasher.finalize().into()
    }

    /// Checked sum of all input amounts. `None` means a u64 overflow, which
    /// validation treats as a hard rejection.
    pub fn inputs_amount(&self) -> Option<u64> {
        self.inputs.iter().try_fold(0u64, |acc, input| match input {
            TxIn::Base(_) => Some(acc),
            TxIn::Key(key_input) => acc.checked_add(key_input.amount),
            TxIn::Multisig(multisig) => acc.checked_add(multisig.amount),
        })
    }

    /// Checked sum of all output amounts.
    pub fn outputs_amount(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, output| acc.checked_add(output.amount))
    }
}

impl Tx {
    /// Hash of the signed portion; see [`TxPrefix::hash`].
    pub fn prefix_hash(&self) -> [u8; 32] {
        self.prefix.hash()
    }

    /// The transaction id: a hash over the prefix hash and all signatures.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(TX_DOMAIN_TAG);
        hasher.update(self.prefix_hash());
        hasher.update((self.signatures.len() as u64).to_le_bytes());
        for signature in &self.signatures {
            hasher.update(signature.c_zero.as_bytes());
            hasher.update((signature.responses.len() as u64).to_le_bytes());
            for response in &signature.responses {
                hasher.update(response.as_bytes());
            }
            hasher.update(signature.key_image.as_bytes());
        }
        hasher.finalize().into()
    }

    /// Key images of all key inputs, in input order.
    pub fn key_images(&self) -> Vec<KeyImage> {
        self.prefix
            .inputs
            .iter()
            .filter_map(|input| match input {
                TxIn::Key(key_input) => Some(key_input.key_image),
                _ => None,
            })
            .collect()
    }

    /// The implicit fee: total inputs minus total outputs.
    ///
    /// `None` if either side overflows or outputs exceed inputs. Coinbase
    /// transactions have no meaningful fee.
    pub fn fee(&self) -> Option<u64> {
        let inputs = self.prefix.inputs_amount()?;
        let outputs = self.prefix.outputs_amount()?;
        inputs.checked_sub(outputs)
    }
}
