use crate::crypto::parameters::DomainParameters;
use crate::number_theory::{mod_pow, random_in_range};
use num_bigint::BigUint;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use std::fmt;

/// One side of a key agreement: publishes a value and combines it with a peer's.
pub trait KeyAgreement {
    type PublicKey;
    type SharedSecret;
    type Error;

    fn public_key(&self) -> Self::PublicKey;
    fn compute_shared_key(
        &self,
        peer_public: &Self::PublicKey,
    ) -> Result<Self::SharedSecret, Self::Error>;
}

/// Private exponent and the public value derived from it.
#[derive(Clone)]
pub(crate) struct KeyPair {
    pub(crate) private_exponent: BigUint,
    pub(crate) public_value: BigUint,
}

impl KeyPair {
    /// Draws x uniformly from [2, p-2] and sets y = g^x mod p.
    ///
    /// Redraws while y is 1 or p-1; callers must have validated `params`, which rules out
    /// a generator of order 2 and so guarantees termination.
    pub(crate) fn generate<R: RngCore + CryptoRng + ?Sized>(
        params: &DomainParameters,
        rng: &mut R,
    ) -> Result<Self, rand::Error> {
        let one = BigUint::one();
        let p = params.modulus();
        let low = BigUint::from(2u8);
        let high = p - &low;
        let p_minus_1 = p - &one;

        loop {
            let private_exponent = random_in_range(&mut *rng, &low, &high)?;
            let public_value = mod_pow(params.generator(), &private_exponent, p);

            if public_value != one && public_value != p_minus_1 {
                return Ok(Self {
                    private_exponent,
                    public_value,
                });
            }
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_exponent", &"<redacted>")
            .field("public_value", &self.public_value)
            .finish()
    }
}
