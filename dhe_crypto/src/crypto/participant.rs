use crate::crypto::key_exchange_traits::{KeyAgreement, KeyPair};
use crate::crypto::parameters::DomainParameters;
use crate::encoding::{from_fixed_be, to_fixed_be};
use crate::error::{EncodingError, InvalidPeerKeyError, Result};
use crate::number_theory::mod_pow;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which side of the exchange a participant plays. Only used for labelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Initiator,
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => f.write_str("Initiator"),
            Role::Responder => f.write_str("Responder"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticipantState {
    /// Key pair generated, no secret derived yet
    KeyGenerated,
    /// At least one shared secret has been derived
    SecretDerived,
}

/// One party's key material for a Diffie-Hellman exchange.
///
/// The key pair is generated at construction and never changes, so a participant can
/// derive secrets with any number of peers using the same parameters, from any thread.
pub struct Participant {
    parameters: Arc<DomainParameters>,
    keypair: KeyPair,
    role: Option<Role>,
    derived: AtomicBool,
}

impl Participant {
    /// Validates `parameters` and generates a key pair from the operating system's RNG.
    pub fn new(parameters: impl Into<Arc<DomainParameters>>, role: Option<Role>) -> Result<Self> {
        Self::with_rng(parameters, role, &mut OsRng)
    }

    /// Same as [`new`](Self::new) with a caller-supplied cryptographic RNG.
    pub fn with_rng<R: RngCore + CryptoRng + ?Sized>(
        parameters: impl Into<Arc<DomainParameters>>,
        role: Option<Role>,
        rng: &mut R,
    ) -> Result<Self> {
        let parameters = parameters.into();
        parameters.validate()?;

        let keypair = KeyPair::generate(&parameters, rng)?;
        log::debug!(
            "{} generated key pair over {}",
            role.map_or_else(|| "participant".to_string(), |r| r.to_string()),
            parameters.fingerprint()
        );

        Ok(Self {
            parameters,
            keypair,
            role,
            derived: AtomicBool::new(false),
        })
    }

    pub fn initiator(parameters: impl Into<Arc<DomainParameters>>) -> Result<Self> {
        Self::new(parameters, Some(Role::Initiator))
    }

    pub fn responder(parameters: impl Into<Arc<DomainParameters>>) -> Result<Self> {
        Self::new(parameters, Some(Role::Responder))
    }

    pub fn parameters(&self) -> &Arc<DomainParameters> {
        &self.parameters
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn state(&self) -> ParticipantState {
        if self.derived.load(Ordering::Acquire) {
            ParticipantState::SecretDerived
        } else {
            ParticipantState::KeyGenerated
        }
    }

    /// g^x mod p; safe to send over an untrusted channel.
    pub fn public_key(&self) -> BigUint {
        self.keypair.public_value.clone()
    }

    /// Public key as big-endian bytes padded to the modulus width.
    pub fn public_key_bytes(&self) -> std::result::Result<Vec<u8>, EncodingError> {
        to_fixed_be(&self.keypair.public_value, self.parameters.byte_len())
    }

    /// peer^x mod p, after refusing degenerate peer values.
    ///
    /// Rejects 0, anything >= p, 1 and p-1, and when the subgroup order q is known,
    /// any value with peer^q != 1. A result of 1 is also refused: it means the peer
    /// pushed the exchange into a subgroup whose order divides our exponent.
    pub fn compute_shared_key(
        &self,
        peer_public: &BigUint,
    ) -> std::result::Result<BigUint, InvalidPeerKeyError> {
        if let Err(e) = self.check_peer(peer_public) {
            log::debug!("rejecting peer public key: {}", e);
            return Err(e);
        }

        let p = self.parameters.modulus();
        let secret = mod_pow(peer_public, &self.keypair.private_exponent, p);
        if secret.is_one() {
            log::debug!("rejecting peer public key: derived secret is 1");
            return Err(InvalidPeerKeyError::LowOrder);
        }

        self.derived.store(true, Ordering::Release);
        Ok(secret)
    }

    /// Decodes a fixed-width peer key (see [`public_key_bytes`](Self::public_key_bytes))
    /// and derives the secret.
    pub fn compute_shared_key_bytes(&self, peer_public: &[u8]) -> Result<BigUint> {
        let peer = from_fixed_be(peer_public, self.parameters.byte_len())?;
        Ok(self.compute_shared_key(&peer)?)
    }

    fn check_peer(&self, peer: &BigUint) -> std::result::Result<(), InvalidPeerKeyError> {
        let one = BigUint::one();
        let p = self.parameters.modulus();

        if peer.is_zero() || peer >= p {
            return Err(InvalidPeerKeyError::OutOfRange);
        }
        if *peer == one || *peer == p - &one {
            return Err(InvalidPeerKeyError::LowOrder);
        }
        if let Some(q) = self.parameters.subgroup_order() {
            if peer.modpow(q, p) != one {
                return Err(InvalidPeerKeyError::OutsideSubgroup);
            }
        }
        Ok(())
    }
}

impl KeyAgreement for Participant {
    type PublicKey = BigUint;
    type SharedSecret = BigUint;
    type Error = InvalidPeerKeyError;

    fn public_key(&self) -> BigUint {
        Participant::public_key(self)
    }

    fn compute_shared_key(
        &self,
        peer_public: &BigUint,
    ) -> std::result::Result<BigUint, InvalidPeerKeyError> {
        Participant::compute_shared_key(self, peer_public)
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("role", &self.role)
            .field("parameters", &self.parameters.fingerprint())
            .field("keypair", &self.keypair)
            .field("state", &self.state())
            .finish()
    }
}
