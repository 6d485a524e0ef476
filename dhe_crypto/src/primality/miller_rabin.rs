use crate::number_theory::random_in_range;
use crate::primality::PrimalityTest;
use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;

/// Miller–Rabin strong probable-prime test.
///
/// A composite passes a single round with probability at most 1/4.
#[derive(Debug, Default, Clone, Copy)]
pub struct MillerRabinTest;

impl PrimalityTest for MillerRabinTest {
    fn run_iteration(&self, n: &BigUint, rng: &mut dyn RngCore) -> Result<bool, rand::Error> {
        let one = BigUint::one();
        let two = BigUint::from(2u8);

        if *n < BigUint::from(5u8) {
            return Ok(*n == two || *n == BigUint::from(3u8));
        }
        if !n.bit(0) {
            return Ok(false);
        }

        // n - 1 = d * 2^s with d odd
        let upper = n - &one;
        let s = upper.trailing_zeros().unwrap_or(0);
        let d = &upper >> s;

        // witness in [2, n-2]
        let a = random_in_range(rng, &two, &(n - 2u32))?;
        let mut x = a.modpow(&d, n);

        if x == one || x == upper {
            return Ok(true);
        }

        for _ in 1..s {
            x = (&x * &x) % n;

            if x == upper {
                return Ok(true);
            }
            if x == one {
                return Ok(false);
            }
        }

        Ok(false)
    }

    fn bits_per_round(&self) -> u32 {
        2
    }
}
