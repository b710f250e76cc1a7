// Copyright (c) 2019-2025 The Umbra Foundation

//! Account keys and public addresses.

use crate::domain_separators::{SPEND_KEY_DOMAIN_SEPARATOR, VIEW_KEY_DOMAIN_SEPARATOR};
use blake2::{Blake2b512, Digest};
use core::{
    fmt,
    hash::{Hash, Hasher},
};
use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use umb_crypto_keys::{RistrettoPrivate, RistrettoPublic};
use umb_util_from_random::FromRandom;
use zeroize::Zeroize;

/// An Umbra user's public address.
#[derive(
    Clone, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Zeroize,
)]
pub struct PublicAddress {
    /// The user's public view key `A`.
    view_public_key: RistrettoPublic,

    /// The user's public spend key `B`.
    spend_public_key: RistrettoPublic,
}

impl fmt::Display for PublicAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UMB")?;
        for byte in self
            .spend_public_key
            .to_bytes()
            .iter()
            .chain(self.view_public_key.to_bytes().iter())
        {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PublicAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicAddress({self})")
    }
}

impl PublicAddress {
    /// Create a new public address from a key pair.
    ///
    /// # Arguments
    /// `spend_public_key` - The user's public spend key `B`,
    /// `view_public_key` - The user's public view key `A`,
    #[inline]
    pub fn new(spend_public_key: &RistrettoPublic, view_public_key: &RistrettoPublic) -> Self {
        Self {
            view_public_key: *view_public_key,
            spend_public_key: *spend_public_key,
        }
    }

    /// Get the public view key.
    pub fn view_public_key(&self) -> &RistrettoPublic {
        &self.view_public_key
    }

    /// Get the public spend key.
    pub fn spend_public_key(&self) -> &RistrettoPublic {
        &self.spend_public_key
    }
}

impl FromRandom for PublicAddress {
    fn from_random<T: RngCore + CryptoRng>(rng: &mut T) -> Self {
        PublicAddress::new(
            &RistrettoPublic::from_random(rng),
            &RistrettoPublic::from_random(rng),
        )
    }
}

/// Complete account key.
///
/// Contains the pair of private keys, which can be used for identifying and
/// spending owned outputs. This should only ever be present in client code.
#[derive(Clone, Deserialize, Serialize, Zeroize)]
#[zeroize(drop)]
pub struct AccountKey {
    /// Private key `a` used for view-key matching.
    view_private_key: RistrettoPrivate,

    /// Private key `b` used for spending.
    spend_private_key: RistrettoPrivate,
}

// Note: Hash and Eq are implemented in terms of public_address() because
// we don't want comparisons to leak private key details over side-channels.
impl Hash for AccountKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.public_address().hash(state)
    }
}

impl Eq for AccountKey {}

impl PartialEq for AccountKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_address().eq(&other.public_address())
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AccountKey({:?})", self.public_address())
    }
}

impl AccountKey {
    /// Create an account key from its component private keys.
    ///
    /// # Arguments
    /// * `spend_private_key` - The user's private spend key `b`.
    /// * `view_private_key` - The user's private view key `a`.
    #[inline]
    pub fn new(spend_private_key: &RistrettoPrivate, view_private_key: &RistrettoPrivate) -> Self {
        Self {
            view_private_key: view_private_key.clone(),
            spend_private_key: spend_private_key.clone(),
        }
    }

    /// Derive an account key deterministically from 32 bytes of entropy.
    ///
    /// Both private keys are domain-separated hashes of the entropy, so a
    /// wallet can be restored from the entropy alone.
    pub fn from_entropy(entropy: &[u8; 32]) -> Self {
        let view_private_key = RistrettoPrivate::from(Scalar::from_hash(
            Blake2b512::new()
                .chain_update(VIEW_KEY_DOMAIN_SEPARATOR)
                .chain_update(entropy),
        ));
        let spend_private_key = RistrettoPrivate::from(Scalar::from_hash(
            Blake2b512::new()
                .chain_update(SPEND_KEY_DOMAIN_SEPARATOR)
                .chain_update(entropy),
        ));
        Self {
            view_private_key,
            spend_private_key,
        }
    }

    /// The private view key `a`.
    pub fn view_private_key(&self) -> &RistrettoPrivate {
        &self.view_private_key
    }

    /// The private spend key `b`.
    pub fn spend_private_key(&self) -> &RistrettoPrivate {
        &self.spend_private_key
    }

    /// The public view key `A = a * G`.
    pub fn view_public_key(&self) -> RistrettoPublic {
        RistrettoPublic::from(&self.view_private_key)
    }

    /// The public spend key `B = b * G`.
    pub fn spend_public_key(&self) -> RistrettoPublic {
        RistrettoPublic::from(&self.spend_private_key)
    }

    /// The account's public address (A, B).
    pub fn public_address(&self) -> PublicAddress {
        PublicAddress::new(&self.spend_public_key(), &self.view_public_key())
    }
}

impl FromRandom for AccountKey {
    fn from_random<T: RngCore + CryptoRng>(rng: &mut T) -> Self {
        Self::new(
            &RistrettoPrivate::from_random(rng),
            &RistrettoPrivate::from_random(rng),
        )
    }
}
