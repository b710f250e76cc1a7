// Copyright (c) 2019-2025 The Umbra Foundation

//! Assembly and signing of transactions.

use crate::{TxBuilderError, TxDestinationEntry, TxSourceEntry};
use rand_core::{CryptoRng, RngCore};
use umb_account_keys::AccountKey;
use umb_crypto_keys::{CompressedRistrettoPublic, KeyPair, RistrettoPublic};
use umb_crypto_ring_signature::{
    onetime_keys::{derive_public_key, KeyDerivation},
    RingSignature,
};
use umb_transaction_core::{
    constants::TX_VERSION,
    extra::add_tx_public_key_to_extra,
    offsets::absolute_offsets_to_relative,
    scan::generate_key_image,
    tx::{KeyInput, KeyOutput, Tx, TxIn, TxOut, TxOutTarget, TxPrefix},
};
use umb_util_from_random::FromRandom;

/// Everything needed to sign one input once the prefix hash is known.
struct InputContext {
    ring: Vec<RistrettoPublic>,
    real_index: usize,
    onetime: KeyPair,
}

/// Construct a signed transaction.
///
/// Outputs are created one-to-one with `destinations`, in list order, each
/// with a one-time key derived from a fresh transaction key; amounts are
/// never merged, so callers wanting denominated outputs decompose amounts
/// upstream. Inputs are built from `sources` in list order, and
/// `signatures[i]` of the result authorizes input `i` over the prefix hash.
///
/// The difference between total source and total destination amounts is the
/// implicit fee, which must not be negative.
pub fn construct_transaction<R: RngCore + CryptoRng>(
    sender: &AccountKey,
    sources: &[TxSourceEntry],
    destinations: &[TxDestinationEntry],
    extra: Vec<u8>,
    unlock_time: u64,
    rng: &mut R,
) -> Result<Tx, TxBuilderError> {
    if sources.is_empty() {
        return Err(TxBuilderError::NoInputs);
    }
    if destinations.is_empty() {
        return Err(TxBuilderError::NoDestinations);
    }

    let source_total = sources
        .iter()
        .try_fold(0u64, |acc, source| acc.checked_add(source.amount))
        .ok_or(TxBuilderError::AmountOverflow)?;
    let destination_total = destinations
        .iter()
        .try_fold(0u64, |acc, destination| acc.checked_add(destination.amount))
        .ok_or(TxBuilderError::AmountOverflow)?;
    if destination_total > source_total {
        return Err(TxBuilderError::InsufficientInputAmount(
            destination_total,
            source_total,
        ));
    }

    // Fresh transaction key; the public half is published in extra.
    let tx_key = KeyPair::from_random(rng);
    let mut extra = extra;
    add_tx_public_key_to_extra(&mut extra, &CompressedRistrettoPublic::from(&tx_key.public_key));

    // Inputs: regenerate each source's one-time key and key image, and keep
    // the decompressed ring for signing.
    let mut inputs = Vec::with_capacity(sources.len());
    let mut contexts = Vec::with_capacity(sources.len());
    for source in sources {
        source.validate()?;

        let (onetime, key_image) = generate_key_image(
            sender,
            &source.real_tx_public_key,
            source.real_output_index_in_tx,
        );

        // The key we would spend with must be the declared ring member;
        // anything else means the source does not belong to this account.
        let declared = &source.ring[source.real_output_index].1;
        if &CompressedRistrettoPublic::from(&onetime.public_key) != declared {
            return Err(TxBuilderError::RealOutputKeyMismatch);
        }

        let ring = source
            .ring
            .iter()
            .map(|(_, key)| key.decompress())
            .collect::<Result<Vec<_>, _>>()?;

        let absolute: Vec<u64> = source.ring.iter().map(|(index, _)| *index).collect();

        inputs.push(TxIn::Key(KeyInput {
            amount: source.amount,
            output_offsets: absolute_offsets_to_relative(&absolute),
            key_image,
        }));
        contexts.push(InputContext {
            ring,
            real_index: source.real_output_index,
            onetime,
        });
    }

    // Outputs: one per destination, in destination order.
    let mut outputs = Vec::with_capacity(destinations.len());
    for (output_index, destination) in destinations.iter().enumerate() {
        if destination.amount == 0 {
            return Err(TxBuilderError::ZeroAmountDestination);
        }

        let derivation =
            KeyDerivation::new(destination.address.view_public_key(), &tx_key.private_key);
        let onetime_public = derive_public_key(
            &derivation,
            output_index as u64,
            destination.address.spend_public_key(),
        );

        outputs.push(TxOut {
            amount: destination.amount,
            target: TxOutTarget::Key(KeyOutput {
                key: CompressedRistrettoPublic::from(onetime_public),
            }),
        });
    }

    let prefix = TxPrefix {
        version: TX_VERSION,
        unlock_time,
        inputs,
        outputs,
        extra,
    };

    // Sign each input over the prefix hash, in input order, with the ring in
    // its stored order so verifiers reconstruct the identical message.
    let prefix_hash = prefix.hash();
    let signatures = contexts
        .iter()
        .map(|context| {
            RingSignature::sign(
                &prefix_hash,
                &context.ring,
                context.real_index,
                &context.onetime.private_key,
                rng,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tx { prefix, signatures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;
    use umb_account_keys::PublicAddress;
    use umb_crypto_keys::RistrettoPublic;
    use umb_transaction_core::{
        scan::scan_outputs,
        validation::{validate, validate_signatures, TransactionValidationError},
        ConsensusLimits,
    };
    use umb_util_from_random::FromRandom;

    /// Mint an output owned by `owner` at `index_in_tx` of a synthetic
    /// earlier transaction, and build a source entry spending it inside a
    /// ring of `ring_size` decoys at the given global indices base.
    fn source_for_owned_output(
        owner: &AccountKey,
        amount: u64,
        index_in_tx: u64,
        ring_size: usize,
        first_global_index: u64,
    ) -> TxSourceEntry {
        let mut rng = OsRng;
        let earlier_tx_key = KeyPair::from_random(&mut rng);

        let derivation = KeyDerivation::new(&owner.view_public_key(), &earlier_tx_key.private_key);
        let real_key = derive_public_key(&derivation, index_in_tx, &owner.spend_public_key());

        let real_output_index = ring_size / 2;
        let ring = (0..ring_size)
            .map(|i| {
                let key = if i == real_output_index {
                    CompressedRistrettoPublic::from(real_key)
                } else {
                    CompressedRistrettoPublic::from(RistrettoPublic::from_random(&mut rng))
                };
                (first_global_index + i as u64 * 7, key)
            })
            .collect();

        TxSourceEntry {
            ring,
            real_output_index,
            real_tx_public_key: earlier_tx_key.public_key,
            real_output_index_in_tx: index_in_tx,
            amount,
        }
    }

    fn rings_of(sources: &[TxSourceEntry]) -> Vec<Vec<RistrettoPublic>> {
        sources
            .iter()
            .map(|source| {
                source
                    .ring
                    .iter()
                    .map(|(_, key)| key.decompress().unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_constructed_transaction_validates_end_to_end() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let recipient = AccountKey::from_random(&mut rng);

        let sources = vec![
            source_for_owned_output(&sender, 10_000, 0, 7, 10),
            source_for_owned_output(&sender, 5_000, 2, 7, 500),
        ];
        let destinations = vec![
            TxDestinationEntry::new(12_000, recipient.public_address()),
            TxDestinationEntry::new(2_500, sender.public_address()),
        ];

        let tx = construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng)
            .expect("construction failed");

        // Structure, fee, and signatures all hold.
        assert_eq!(validate(&tx, &ConsensusLimits::mainnet()), Ok(()));
        assert_eq!(tx.fee(), Some(500));
        assert_eq!(validate_signatures(&tx, &rings_of(&sources)), Ok(()));

        // Outputs are one-to-one with destinations, in order.
        assert_eq!(tx.prefix.outputs.len(), 2);
        assert_eq!(tx.prefix.outputs[0].amount, 12_000);
        assert_eq!(tx.prefix.outputs[1].amount, 2_500);
    }

    #[test]
    fn test_recipient_scans_constructed_outputs() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let recipient = AccountKey::from_random(&mut rng);

        let sources = vec![source_for_owned_output(&sender, 10_000, 0, 5, 10)];
        let destinations = vec![
            TxDestinationEntry::new(7_000, recipient.public_address()),
            TxDestinationEntry::new(2_000, sender.public_address()),
        ];

        let tx = construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng)
            .expect("construction failed");

        let received = scan_outputs(&recipient, &tx).unwrap();
        assert_eq!(received.indices, vec![0]);
        assert_eq!(received.amount, 7_000);

        let change = scan_outputs(&sender, &tx).unwrap();
        assert_eq!(change.indices, vec![1]);
        assert_eq!(change.amount, 2_000);
    }

    #[test]
    fn test_key_image_is_stable_across_constructions() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let recipient = AccountKey::from_random(&mut rng);

        let source = source_for_owned_output(&sender, 10_000, 0, 5, 10);
        let destinations = vec![TxDestinationEntry::new(9_000, recipient.public_address())];

        let tx1 = construct_transaction(&sender, &[source.clone()], &destinations, vec![], 0, &mut rng)
            .unwrap();
        let tx2 = construct_transaction(&sender, &[source], &destinations, vec![], 0, &mut rng)
            .unwrap();

        // Spending the same output twice exposes the same key image.
        assert_eq!(tx1.key_images(), tx2.key_images());
    }

    #[test]
    fn test_no_sources_rejected() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let destinations = vec![TxDestinationEntry::new(
            100,
            PublicAddress::from_random(&mut rng),
        )];

        assert_eq!(
            construct_transaction(&sender, &[], &destinations, vec![], 0, &mut rng),
            Err(TxBuilderError::NoInputs)
        );
    }

    #[test]
    fn test_no_destinations_rejected() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let sources = vec![source_for_owned_output(&sender, 10_000, 0, 5, 10)];

        assert_eq!(
            construct_transaction(&sender, &sources, &[], vec![], 0, &mut rng),
            Err(TxBuilderError::NoDestinations)
        );
    }

    #[test]
    fn test_destinations_exceeding_sources_rejected() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let sources = vec![source_for_owned_output(&sender, 1_000, 0, 5, 10)];
        let destinations = vec![TxDestinationEntry::new(
            2_000,
            PublicAddress::from_random(&mut rng),
        )];

        assert_eq!(
            construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng),
            Err(TxBuilderError::InsufficientInputAmount(2_000, 1_000))
        );
    }

    #[test]
    fn test_foreign_source_rejected() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let other = AccountKey::from_random(&mut rng);

        // The source's real output belongs to `other`, not `sender`.
        let sources = vec![source_for_owned_output(&other, 10_000, 0, 5, 10)];
        let destinations = vec![TxDestinationEntry::new(
            9_000,
            PublicAddress::from_random(&mut rng),
        )];

        assert_eq!(
            construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng),
            Err(TxBuilderError::RealOutputKeyMismatch)
        );
    }

    #[test]
    fn test_zero_amount_destination_rejected() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let sources = vec![source_for_owned_output(&sender, 10_000, 0, 5, 10)];
        let destinations = vec![TxDestinationEntry::new(
            0,
            PublicAddress::from_random(&mut rng),
        )];

        assert_eq!(
            construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng),
            Err(TxBuilderError::ZeroAmountDestination)
        );
    }

    #[test]
    fn test_signature_order_matches_input_order() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let recipient = AccountKey::from_random(&mut rng);

        let sources = vec![
            source_for_owned_output(&sender, 4_000, 0, 4, 10),
            source_for_owned_output(&sender, 6_000, 1, 6, 900),
        ];
        let destinations = vec![TxDestinationEntry::new(9_000, recipient.public_address())];

        let tx = construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng)
            .unwrap();
        assert_eq!(tx.signatures.len(), tx.prefix.inputs.len());

        // Swapping the two signatures breaks the input correspondence.
        let mut swapped = tx.clone();
        swapped.signatures.swap(0, 1);
        assert_eq!(
            validate_signatures(&swapped, &rings_of(&sources)),
            Err(TransactionValidationError::KeyImageMismatch)
        );
    }

    #[test]
    fn test_repeated_destination_addresses_stay_separate() {
        let mut rng = OsRng;
        let sender = AccountKey::from_random(&mut rng);
        let recipient = AccountKey::from_random(&mut rng);

        let sources = vec![source_for_owned_output(&sender, 10_000, 0, 5, 10)];
        let destinations = vec![
            TxDestinationEntry::new(3_000, recipient.public_address()),
            TxDestinationEntry::new(3_000, recipient.public_address()),
        ];

        let tx = construct_transaction(&sender, &sources, &destinations, vec![], 0, &mut rng)
            .unwrap();

        // Two outputs, not one merged 6000 output, and distinct one-time keys.
        assert_eq!(tx.prefix.outputs.len(), 2);
        let keys: Vec<_> = tx
            .prefix
            .outputs
            .iter()
            .map(|output| match &output.target {
                TxOutTarget::Key(key_output) => key_output.key,
                _ => unreachable!(),
            })
            .collect();
        assert_ne!(keys[0], keys[1]);

        let received = scan_outputs(&recipient, &tx).unwrap();
        assert_eq!(received.indices, vec![0, 1]);
        assert_eq!(received.amount, 6_000);
    }
}
