use dhe_crypto::primality::{MillerRabinTest, PrimalityTest};
use num_bigint::BigUint;
use num_traits::FromPrimitive;
use quickcheck::quickcheck;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x00C0FFEE)
}

struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        panic!("infallible draw on a broken source")
    }
    fn next_u64(&mut self) -> u64 {
        panic!("infallible draw on a broken source")
    }
    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("infallible draw on a broken source")
    }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy unavailable",
        )))
    }
}

#[test]
fn test_miller_rabin_on_primes() {
    let test = MillerRabinTest;
    let primes = [5u32, 7, 17, 31, 61, 1009, 7919, 104729];

    for &p in &primes {
        let n = BigUint::from_u32(p).unwrap();
        assert!(
            test.is_probably_prime(&n, 64, &mut rng()).unwrap(),
            "MR failed on prime {}",
            p
        );
    }
}

#[test]
fn test_miller_rabin_on_composites() {
    let test = MillerRabinTest;
    let composites = [9u32, 15, 25, 27, 35, 1009 * 1013, 7919 * 7907];

    for &n in &composites {
        let n = BigUint::from_u32(n).unwrap();
        assert!(
            !test.is_probably_prime(&n, 64, &mut rng()).unwrap(),
            "MR accepted composite {}",
            n
        );
    }
}

#[test]
fn test_miller_rabin_rejects_carmichael_without_trial_division() {
    let test = MillerRabinTest;
    let carmichaels = [561u32, 1105, 1729, 2465, 2821, 6601];
    let mut rng = rng();

    for &n in &carmichaels {
        let n = BigUint::from_u32(n).unwrap();
        let survived = (0..64).all(|_| test.run_iteration(&n, &mut rng).unwrap());
        assert!(!survived, "MR iterations accepted Carmichael number {}", n);
    }
}

#[test]
fn test_miller_rabin_on_small_n() {
    let test = MillerRabinTest;
    let mut rng = rng();

    for v in [0u32, 1, 4] {
        let n = BigUint::from_u32(v).unwrap();
        assert!(
            !test.is_probably_prime(&n, 64, &mut rng).unwrap(),
            "MR incorrectly passed n = {}",
            v
        );
        assert!(
            !test.run_iteration(&n, &mut rng).unwrap(),
            "MR iteration passed n = {}",
            v
        );
    }
    for v in [2u32, 3] {
        let n = BigUint::from_u32(v).unwrap();
        assert!(test.is_probably_prime(&n, 64, &mut rng).unwrap());
        assert!(test.run_iteration(&n, &mut rng).unwrap());
    }
}

#[test]
fn test_miller_rabin_large_cases() {
    let test = MillerRabinTest;

    let prime = BigUint::parse_bytes(b"32416190071", 10).unwrap();
    let composite = &prime * BigUint::parse_bytes(b"32416187567", 10).unwrap();

    assert!(
        test.is_probably_prime(&prime, 64, &mut rng()).unwrap(),
        "MR failed on large prime"
    );
    assert!(
        !test.is_probably_prime(&composite, 64, &mut rng()).unwrap(),
        "MR failed on large composite"
    );
}

#[test]
fn test_mersenne_prime_127() {
    let test = MillerRabinTest;
    let m127 = (BigUint::from(1u8) << 127u32) - 1u32;
    assert!(test.is_probably_prime(&m127, 64, &mut rng()).unwrap());
    // 2^128 + 1 = 59649589127497217 * 5704689200685129054721
    let f7 = (BigUint::from(1u8) << 128u32) + 1u32;
    assert!(!test.is_probably_prime(&f7, 64, &mut rng()).unwrap());
}

#[test]
fn test_witness_draw_reports_broken_random_source() {
    let test = MillerRabinTest;
    let n = BigUint::from_u32(104729).unwrap();
    assert!(test.run_iteration(&n, &mut BrokenRng).is_err());
    assert!(test.is_probably_prime(&n, 64, &mut BrokenRng).is_err());

    // trial division settles these without drawing a witness
    let carmichael = BigUint::from_u32(561).unwrap();
    let small_prime = BigUint::from_u32(997).unwrap();
    assert!(!test.is_probably_prime(&carmichael, 64, &mut BrokenRng).unwrap());
    assert!(test.is_probably_prime(&small_prime, 64, &mut BrokenRng).unwrap());
}

#[test]
fn test_rounds_for_error_bound() {
    let test = MillerRabinTest;
    assert_eq!(test.rounds_for_error_bits(128), 64);
    assert_eq!(test.rounds_for_error_bits(129), 65);
    assert_eq!(test.rounds_for_error_bits(0), 1);
}

quickcheck! {
    fn prop_miller_rabin_rejects_odd_composites(a: u16, b: u16) -> bool {
        if a < 1000 || b < 1000 { return true; }
        let n = (a as u64 | 1) * (b as u64 | 1);
        let n = BigUint::from(n);
        let test = MillerRabinTest;
        !test.is_probably_prime(&n, 64, &mut rng()).unwrap()
    }
}
