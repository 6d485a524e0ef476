use crate::crypto::parameters::DomainParameters;
use crate::error::ParameterGenerationError;
use crate::number_theory::{has_small_factor, mod_pow, random_bits, random_in_range};
use crate::primality::{MillerRabinTest, PrimalityTest};
use num_bigint::BigUint;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::time::{Duration, Instant};

/// Smallest modulus the generator will produce.
pub const SAFETY_FLOOR_BITS: u64 = 512;
/// Modulus size used when none is requested.
pub const DEFAULT_MODULUS_BITS: u64 = 2048;
/// Default false-positive bound for primality, as log2 of its inverse.
pub const DEFAULT_ERROR_BITS: u32 = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Minimum modulus size in bits
    pub min_bits: u64,
    /// Accept a composite with probability at most 2^-error_bits
    pub error_bits: u32,
    /// Search for p = 2q + 1 with q prime and pick a generator of order q
    pub safe_prime: bool,
    /// Give up with `OperationTimedOut` once this much time has passed
    pub deadline: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_bits: DEFAULT_MODULUS_BITS,
            error_bits: DEFAULT_ERROR_BITS,
            safe_prime: false,
            deadline: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_min_bits(mut self, min_bits: u64) -> Self {
        self.min_bits = min_bits;
        self
    }

    pub fn with_error_bits(mut self, error_bits: u32) -> Self {
        self.error_bits = error_bits;
        self
    }

    pub fn with_safe_prime(mut self, safe_prime: bool) -> Self {
        self.safe_prime = safe_prime;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Produces fresh Diffie-Hellman domain parameters.
///
/// Generation is CPU-bound and its latency varies widely: a random n-bit candidate is
/// prime with probability about 2/(n ln 2) among odd numbers, so a 2048-bit modulus
/// takes on the order of hundreds of candidates, and safe-prime search far more.
/// Do not call this on a latency-sensitive path without caching the result or setting
/// a deadline.
#[derive(Debug, Clone, Default)]
pub struct ParameterGenerator {
    config: GeneratorConfig,
    test: MillerRabinTest,
}

impl ParameterGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            test: MillerRabinTest,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates parameters with a modulus of at least `min_bits` bits using the OS RNG.
    pub fn generate(&self, min_bits: u64) -> Result<DomainParameters, ParameterGenerationError> {
        self.generate_with_rng(min_bits, &mut OsRng)
    }

    /// Generates parameters sized by the configured `min_bits`.
    pub fn generate_default(&self) -> Result<DomainParameters, ParameterGenerationError> {
        self.generate(self.config.min_bits)
    }

    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        &self,
        min_bits: u64,
        rng: &mut R,
    ) -> Result<DomainParameters, ParameterGenerationError> {
        if min_bits < SAFETY_FLOOR_BITS {
            return Err(ParameterGenerationError::BelowSafetyFloor {
                requested: min_bits,
                floor: SAFETY_FLOOR_BITS,
            });
        }

        let mut search = PrimeSearch {
            rng,
            test: &self.test,
            rounds: self.test.rounds_for_error_bits(self.config.error_bits),
            deadline: self.config.deadline,
            started: Instant::now(),
            candidates: 0,
        };

        let params = if self.config.safe_prime {
            let (p, q) = search.safe_prime(min_bits)?;
            let g = search.subgroup_generator(&p)?;
            DomainParameters::with_subgroup_order(p, g, q)
        } else {
            let p = search.prime(min_bits)?;
            let g = random_in_range(&mut *search.rng, &BigUint::from(2u8), &(&p - 2u32))?;
            DomainParameters::new(p, g)
        };

        log::info!(
            "accepted {} after {} candidates in {:?}",
            params.fingerprint(),
            search.candidates,
            search.started.elapsed()
        );
        Ok(params)
    }
}

/// State for one run of the candidate loop.
pub(crate) struct PrimeSearch<'a, R: RngCore> {
    pub(crate) rng: &'a mut R,
    pub(crate) test: &'a MillerRabinTest,
    pub(crate) rounds: u32,
    pub(crate) deadline: Option<Duration>,
    pub(crate) started: Instant,
    pub(crate) candidates: u64,
}

impl<R: RngCore> PrimeSearch<'_, R> {
    fn tick(&mut self) -> Result<(), ParameterGenerationError> {
        if let Some(limit) = self.deadline {
            if self.started.elapsed() >= limit {
                return Err(ParameterGenerationError::OperationTimedOut(limit));
            }
        }
        self.candidates += 1;
        Ok(())
    }

    /// Random odd integer with exactly `bits` bits.
    fn candidate(&mut self, bits: u64) -> Result<BigUint, ParameterGenerationError> {
        let mut n = random_bits(&mut *self.rng, bits)?;
        n.set_bit(bits - 1, true);
        n.set_bit(0, true);
        Ok(n)
    }

    fn is_prime(&mut self, n: &BigUint) -> Result<bool, ParameterGenerationError> {
        Ok(self.test.is_probably_prime(n, self.rounds, &mut *self.rng)?)
    }

    /// Probable prime with exactly `bits` bits.
    pub(crate) fn prime(&mut self, bits: u64) -> Result<BigUint, ParameterGenerationError> {
        loop {
            self.tick()?;
            let n = self.candidate(bits)?;
            if has_small_factor(&n) {
                continue;
            }
            if self.is_prime(&n)? {
                log::debug!("{}-bit prime found after {} candidates", bits, self.candidates);
                return Ok(n);
            }
            log::trace!("candidate {} rejected by Miller-Rabin", self.candidates);
        }
    }

    /// Safe prime p = 2q + 1 with exactly `bits` bits, returned with q.
    pub(crate) fn safe_prime(
        &mut self,
        bits: u64,
    ) -> Result<(BigUint, BigUint), ParameterGenerationError> {
        loop {
            self.tick()?;
            let q = self.candidate(bits - 1)?;
            let p = (&q << 1u32) + 1u32;
            if has_small_factor(&q) || has_small_factor(&p) {
                continue;
            }
            if self.is_prime(&q)? && self.is_prime(&p)? {
                log::debug!("{}-bit safe prime found after {} candidates", bits, self.candidates);
                return Ok((p, q));
            }
        }
    }

    /// Generator of the order-q subgroup of a safe prime p: h^2 mod p for random h.
    pub(crate) fn subgroup_generator(
        &mut self,
        p: &BigUint,
    ) -> Result<BigUint, ParameterGenerationError> {
        let one = BigUint::one();
        let two = BigUint::from(2u8);
        let high = p - &two;
        loop {
            let h = random_in_range(&mut *self.rng, &two, &high)?;
            let g = mod_pow(&h, &two, p);
            if g != one {
                return Ok(g);
            }
        }
    }
}
