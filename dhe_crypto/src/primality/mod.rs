pub(crate) mod miller_rabin;
pub use miller_rabin::MillerRabinTest;

use crate::number_theory::small_prime_verdict;
use num_bigint::BigUint;
use rand::RngCore;

/// Interface for a probabilistic primality test.
/// Template method: the public entry point is fixed, implementors supply one iteration.
///
/// Witnesses are drawn with `try_fill_bytes`, so a failing random source surfaces as
/// `Err` rather than a panic.
pub trait PrimalityTest {
    /// Returns true if `n` survives trial division and `rounds` independent iterations.
    fn is_probably_prime(
        &self,
        n: &BigUint,
        rounds: u32,
        rng: &mut dyn RngCore,
    ) -> Result<bool, rand::Error> {
        if let Some(verdict) = small_prime_verdict(n) {
            return Ok(verdict);
        }
        for _ in 0..rounds {
            if !self.run_iteration(n, &mut *rng)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// One iteration of the test with a freshly drawn witness.
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RngCore) -> Result<bool, rand::Error>;

    /// Upper bound on the chance that one iteration passes a composite, as log2 of its inverse.
    fn bits_per_round(&self) -> u32;

    /// Number of rounds needed to push the false-positive bound below 2^-error_bits.
    fn rounds_for_error_bits(&self, error_bits: u32) -> u32 {
        error_bits.div_ceil(self.bits_per_round()).max(1)
    }
}
