use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

/// Primes below 1000, used to discard candidates before any Miller–Rabin round.
pub const SMALL_PRIMES: [u32; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
    89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271,
    277, 281, 283, 293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379,
    383, 389, 397, 401, 409, 419, 421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479,
    487, 491, 499, 503, 509, 521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599,
    601, 607, 613, 617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701,
    709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809, 811, 821, 823,
    827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911, 919, 929, 937, 941,
    947, 953, 967, 971, 977, 983, 991, 997,
];

/// base^exponent mod modulus.
///
/// Runs a Montgomery ladder over `max(bits(modulus), bits(exponent))` bits, so every
/// call with the same modulus performs the same sequence of multiplications and
/// squarings regardless of the exponent's value. Big-integer arithmetic itself is not
/// constant time; this only removes the exponent-dependent branch structure of plain
/// square-and-multiply.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() || modulus.is_one() {
        return BigUint::zero();
    }
    let bits = modulus.bits().max(exponent.bits());

    let mut r0 = BigUint::one();
    let mut r1 = base % modulus;

    for i in (0..bits).rev() {
        if exponent.bit(i) {
            r0 = (&r0 * &r1) % modulus;
            r1 = (&r1 * &r1) % modulus;
        } else {
            r1 = (&r0 * &r1) % modulus;
            r0 = (&r0 * &r0) % modulus;
        }
    }
    r0
}

/// Uniform integer in [0, 2^bits) drawn from `rng`.
pub fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: u64) -> Result<BigUint, rand::Error> {
    let len = bits.div_ceil(8) as usize;
    let mut buf = vec![0u8; len];
    rng.try_fill_bytes(&mut buf)?;

    let excess = (len as u64) * 8 - bits;
    if let Some(top) = buf.first_mut() {
        *top &= 0xFFu8 >> excess;
    }
    Ok(BigUint::from_bytes_be(&buf))
}

/// Uniform integer in the inclusive range [low, high], by rejection sampling.
///
/// # Panics
///
/// Panics if `low > high`.
pub fn random_in_range<R: RngCore + ?Sized>(
    rng: &mut R,
    low: &BigUint,
    high: &BigUint,
) -> Result<BigUint, rand::Error> {
    let span = high - low;
    let bits = span.bits();
    loop {
        let offset = random_bits(rng, bits)?;
        if offset <= span {
            return Ok(low + offset);
        }
    }
}

/// Settles primality by trial division when it can.
///
/// `Some(true)` for a prime in [`SMALL_PRIMES`], `Some(false)` for 0, 1 or any number
/// with a factor in the table, `None` when only a probabilistic test can decide.
pub fn small_prime_verdict(n: &BigUint) -> Option<bool> {
    if *n < BigUint::from(2u8) {
        return Some(false);
    }
    for &p in SMALL_PRIMES.iter() {
        if *n == BigUint::from(p) {
            return Some(true);
        }
        if (n % p).is_zero() {
            return Some(false);
        }
    }
    None
}

/// True if any prime below 1000 divides `n` (and `n` is not that prime).
pub fn has_small_factor(n: &BigUint) -> bool {
    small_prime_verdict(n) == Some(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ladder_matches_textbook_example() {
        let result = mod_pow(
            &BigUint::from(4u32),
            &BigUint::from(13u32),
            &BigUint::from(497u32),
        );
        assert_eq!(result, BigUint::from(445u32));
    }

    #[test]
    fn ladder_handles_exponent_wider_than_modulus() {
        let base = BigUint::from(3u32);
        let exponent = BigUint::from(1u64 << 40) + 7u32;
        let modulus = BigUint::from(101u32);
        assert_eq!(mod_pow(&base, &exponent, &modulus), base.modpow(&exponent, &modulus));
    }

    #[test]
    fn ladder_degenerate_moduli() {
        let five = BigUint::from(5u32);
        assert!(mod_pow(&five, &five, &BigUint::zero()).is_zero());
        assert!(mod_pow(&five, &five, &BigUint::one()).is_zero());
        assert_eq!(mod_pow(&five, &BigUint::zero(), &BigUint::from(7u32)), BigUint::one());
    }

    #[test]
    fn random_bits_respects_width() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for bits in [1u64, 7, 8, 9, 63, 64, 65, 257] {
            for _ in 0..32 {
                assert!(random_bits(&mut rng, bits).unwrap().bits() <= bits);
            }
        }
        assert!(random_bits(&mut rng, 0).unwrap().is_zero());
    }

    #[test]
    fn random_in_range_stays_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(0xB0B);
        let low = BigUint::from(2u32);
        let high = BigUint::from(21u32);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..2000 {
            let v = random_in_range(&mut rng, &low, &high).unwrap();
            assert!(v >= low && v <= high);
            seen_low |= v == low;
            seen_high |= v == high;
        }
        assert!(seen_low && seen_high, "range endpoints never drawn");
    }

    #[test]
    fn random_in_range_single_point() {
        let mut rng = StdRng::seed_from_u64(1);
        let point = BigUint::from(42u32);
        assert_eq!(random_in_range(&mut rng, &point, &point).unwrap(), point);
    }

    #[test]
    fn trial_division_verdicts() {
        assert_eq!(small_prime_verdict(&BigUint::zero()), Some(false));
        assert_eq!(small_prime_verdict(&BigUint::one()), Some(false));
        assert_eq!(small_prime_verdict(&BigUint::from(2u32)), Some(true));
        assert_eq!(small_prime_verdict(&BigUint::from(997u32)), Some(true));
        assert_eq!(small_prime_verdict(&BigUint::from(561u32)), Some(false));
        assert_eq!(small_prime_verdict(&BigUint::from(1009u32)), None);
        assert_eq!(small_prime_verdict(&BigUint::from(1009u32 * 1013)), None);
        assert!(has_small_factor(&BigUint::from(1009u32 * 3)));
    }
}
