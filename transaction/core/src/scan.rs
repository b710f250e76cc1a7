// Copyright (c) 2019-2025 The Umbra Foundation

//! Output-ownership scanning and one-time key recovery.
//!
//! A wallet walks every new transaction, recomputes the Diffie-Hellman
//! derivation from the transaction public key and its view private key, and
//! checks each key output against the one-time key it would have derived for
//! itself at that position.

use crate::{
    extra::{ExtraError, TxExtra},
    tx::{KeyOutput, Tx, TxOutTarget},
};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use umb_account_keys::AccountKey;
use umb_crypto_keys::{KeyError, KeyPair, RistrettoPublic};
use umb_crypto_ring_signature::{
    onetime_keys::{derive_private_key, derive_public_key, KeyDerivation},
    KeyImage,
};

/// An error which can occur when scanning a transaction's outputs.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ScanError {
    /// The extra field does not carry a transaction public key
    MissingTxPublicKey,

    /// The extra field could not be parsed: {0}
    Extra(ExtraError),

    /// Key: {0}
    Key(KeyError),

    /// Total received amount overflows
    AmountOverflow,
}

impl From<ExtraError> for ScanError {
    fn from(src: ExtraError) -> Self {
        Self::Extra(src)
    }
}

impl From<KeyError> for ScanError {
    fn from(src: KeyError) -> Self {
        Self::Key(src)
    }
}

/// The outputs of one transaction owned by a scanned account.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanSummary {
    /// Indices into `tx.prefix.outputs` of the owned outputs.
    pub indices: Vec<usize>,

    /// Sum of the owned outputs' amounts.
    pub amount: u64,
}

/// Whether `output` is addressed to `account`, given the shared-secret
/// derivation and the output's key index within its transaction.
///
/// A malformed output key is simply not ours.
pub fn is_output_owned(
    account: &AccountKey,
    output: &KeyOutput,
    derivation: &KeyDerivation,
    key_index: u64,
) -> bool {
    let candidate = match output.key.decompress() {
        Ok(key) => key,
        Err(_) => return false,
    };
    let expected = derive_public_key(derivation, key_index, &account.spend_public_key());
    bool::from(expected.to_bytes()[..].ct_eq(&candidate.to_bytes()[..]))
}

/// [`is_output_owned`], computing the derivation from the raw transaction
/// public key. Equivalent to the derivation overload for the same inputs.
pub fn is_output_owned_with_tx_key(
    account: &AccountKey,
    output: &KeyOutput,
    tx_public_key: &RistrettoPublic,
    key_index: u64,
) -> bool {
    let derivation = KeyDerivation::new(tx_public_key, account.view_private_key());
    is_output_owned(account, output, &derivation, key_index)
}

/// Scan all outputs of `tx` for ones addressed to `account`.
///
/// The transaction public key is read from the extra field.
pub fn scan_outputs(account: &AccountKey, tx: &Tx) -> Result<ScanSummary, ScanError> {
    let parsed = TxExtra::parse(&tx.prefix.extra)?;
    let tx_public_key = parsed
        .tx_public_key
        .ok_or(ScanError::MissingTxPublicKey)?
        .decompress()?;
    let derivation = KeyDerivation::new(&tx_public_key, account.view_private_key());
    scan_outputs_with_derivation(account, tx, &derivation)
}

/// Scan with a precomputed derivation.
///
/// The key index advances by one slot per key output, and by the number of
/// member keys for a multisignature output, which a single-key scan never
/// owns. Skipping those slots exactly is what keeps this scan aligned with
/// wallets that do cosign multisignature outputs.
pub fn scan_outputs_with_derivation(
    account: &AccountKey,
    tx: &Tx,
    derivation: &KeyDerivation,
) -> Result<ScanSummary, ScanError> {
    let mut summary = ScanSummary::default();
    let mut key_index = 0u64;

    for (output_index, output) in tx.prefix.outputs.iter().enumerate() {
        match &output.target {
            TxOutTarget::Key(key_output) => {
                if is_output_owned(account, key_output, derivation, key_index) {
                    summary.indices.push(output_index);
                    summary.amount = summary
                        .amount
                        .checked_add(output.amount)
                        .ok_or(ScanError::AmountOverflow)?;
                }
                key_index += 1;
            }
            TxOutTarget::Multisig(multisig) => {
                key_index += multisig.keys.len() as u64;
            }
        }
    }

    Ok(summary)
}

/// Recover the one-time key pair of an owned output and its key image.
///
/// `real_output_index` is the output's key index within the transaction that
/// created it. The key image is deterministic: recomputing it for the same
/// output always yields the same point, which is what lets every node agree
/// on whether an output was already spent.
pub fn generate_key_image(
    account: &AccountKey,
    tx_public_key: &RistrettoPublic,
    real_output_index: u64,
) -> (KeyPair, KeyImage) {
    let derivation = KeyDerivation::new(tx_public_key, account.view_private_key());
    let ephemeral_private =
        derive_private_key(&derivation, real_output_index, account.spend_private_key());
    let ephemeral = KeyPair::from_private(ephemeral_private);
    let key_image = KeyImage::from(&ephemeral.private_key);
    (ephemeral, key_image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        extra::add_tx_public_key_to_extra,
        tx::{MultisigOutput, TxOut, TxPrefix},
    };
    use rand_core::OsRng;
    use umb_crypto_keys::CompressedRistrettoPublic;
    use umb_util_from_random::FromRandom;

    /// Build a transaction with one key output per entry of `recipients`,
    /// derived from a fresh transaction key.
    fn tx_to_recipients(recipients: &[&AccountKey]) -> (Tx, KeyPair) {
        let tx_key = KeyPair::from_random(&mut OsRng);

        let outputs = recipients
            .iter()
            .enumerate()
            .map(|(index, recipient)| {
                let derivation =
                    KeyDerivation::new(&recipient.view_public_key(), &tx_key.private_key);
                let onetime =
                    derive_public_key(&derivation, index as u64, &recipient.spend_public_key());
                TxOut {
                    amount: 1000 * (index as u64 + 1),
                    target: TxOutTarget::Key(KeyOutput {
                        key: CompressedRistrettoPublic::from(onetime),
                    }),
                }
            })
            .collect();

        let mut extra = Vec::new();
        add_tx_public_key_to_extra(
            &mut extra,
            &CompressedRistrettoPublic::from(&tx_key.public_key),
        );

        let tx = Tx {
            prefix: TxPrefix {
                version: 1,
                unlock_time: 0,
                inputs: vec![],
                outputs,
                extra,
            },
            signatures: vec![],
        };
        (tx, tx_key)
    }

    #[test]
    fn test_recipient_finds_own_outputs() {
        let alice = AccountKey::from_random(&mut OsRng);
        let bob = AccountKey::from_random(&mut OsRng);

        let (tx, _) = tx_to_recipients(&[&alice, &bob, &alice]);

        let summary = scan_outputs(&alice, &tx).unwrap();
        assert_eq!(summary.indices, vec![0, 2]);
        assert_eq!(summary.amount, 1000 + 3000);

        let summary = scan_outputs(&bob, &tx).unwrap();
        assert_eq!(summary.indices, vec![1]);
        assert_eq!(summary.amount, 2000);
    }

    #[test]
    fn test_stranger_finds_nothing() {
        let alice = AccountKey::from_random(&mut OsRng);
        let eve = AccountKey::from_random(&mut OsRng);

        let (tx, _) = tx_to_recipients(&[&alice]);

        let summary = scan_outputs(&eve, &tx).unwrap();
        assert!(summary.indices.is_empty());
        assert_eq!(summary.amount, 0);
    }

    #[test]
    fn test_ownership_overloads_agree() {
        let alice = AccountKey::from_random(&mut OsRng);
        let (tx, tx_key) = tx_to_recipients(&[&alice]);

        let key_output = match &tx.prefix.outputs[0].target {
            TxOutTarget::Key(key_output) => key_output.clone(),
            _ => unreachable!(),
        };

        let derivation = KeyDerivation::new(&tx_key.public_key, alice.view_private_key());
        assert!(is_output_owned(&alice, &key_output, &derivation, 0));
        assert!(is_output_owned_with_tx_key(
            &alice,
            &key_output,
            &tx_key.public_key,
            0
        ));
    }

    #[test]
    fn test_multisig_output_advances_key_index() {
        let alice = AccountKey::from_random(&mut OsRng);
        let tx_key = KeyPair::from_random(&mut OsRng);

        // Output 0 is a 3-key multisig, so Alice's key output at position 1
        // sits at key index 3.
        let derivation = KeyDerivation::new(&alice.view_public_key(), &tx_key.private_key);
        let onetime = derive_public_key(&derivation, 3, &alice.spend_public_key());

        let mut extra = Vec::new();
        add_tx_public_key_to_extra(
            &mut extra,
            &CompressedRistrettoPublic::from(&tx_key.public_key),
        );

        let tx = Tx {
            prefix: TxPrefix {
                version: 1,
                unlock_time: 0,
                inputs: vec![],
                outputs: vec![
                    TxOut {
                        amount: 500,
                        target: TxOutTarget::Multisig(MultisigOutput {
                            keys: vec![
                                CompressedRistrettoPublic::from([1u8; 32]),
                                CompressedRistrettoPublic::from([2u8; 32]),
                                CompressedRistrettoPublic::from([3u8; 32]),
                            ],
                            required_signature_count: 2,
                        }),
                    },
                    TxOut {
                        amount: 700,
                        target: TxOutTarget::Key(KeyOutput {
                            key: CompressedRistrettoPublic::from(onetime),
                        }),
                    },
                ],
                extra,
            },
            signatures: vec![],
        };

        let summary = scan_outputs(&alice, &tx).unwrap();
        assert_eq!(summary.indices, vec![1]);
        assert_eq!(summary.amount, 700);

        // Had the multisig consumed only one slot, the output would have
        // been derived at key index 1 and missed.
        let wrong = derive_public_key(&derivation, 1, &alice.spend_public_key());
        assert_ne!(wrong, derive_public_key(&derivation, 3, &alice.spend_public_key()));
    }

    #[test]
    fn test_missing_tx_public_key() {
        let alice = AccountKey::from_random(&mut OsRng);
        let tx = Tx::default();
        assert_eq!(
            scan_outputs(&alice, &tx),
            Err(ScanError::MissingTxPublicKey)
        );
    }

    #[test]
    fn test_key_image_is_deterministic_per_output() {
        let alice = AccountKey::from_random(&mut OsRng);
        let tx_key = KeyPair::from_random(&mut OsRng);

        let (_, image_a) = generate_key_image(&alice, &tx_key.public_key, 0);
        let (_, image_b) = generate_key_image(&alice, &tx_key.public_key, 0);
        let (_, image_other) = generate_key_image(&alice, &tx_key.public_key, 1);

        assert_eq!(image_a, image_b);
        assert_ne!(image_a, image_other);
    }

    #[test]
    fn test_recovered_key_pair_matches_derived_output() {
        let alice = AccountKey::from_random(&mut OsRng);
        let (tx, tx_key) = tx_to_recipients(&[&alice]);

        let (ephemeral, _) = generate_key_image(&alice, &tx_key.public_key, 0);

        let onetime = match &tx.prefix.outputs[0].target {
            TxOutTarget::Key(key_output) => key_output.key,
            _ => unreachable!(),
        };
        assert_eq!(CompressedRistrettoPublic::from(&ephemeral.public_key), onetime);
    }
}
