use crate::encoding::{
    read_length_prefixed, read_length_prefixed_bytes, write_length_prefixed,
    write_length_prefixed_bytes,
};
use crate::error::{EncodingError, Error, InvalidConfigurationError};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;

// RFC 3526 Group 14 (2048-bit MODP Group)
const RFC3526_GROUP14_P: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

/// Public (modulus, generator) pair shared by every participant in a session.
///
/// When the modulus is a safe prime `p = 2q + 1` and the generator has order `q`, the
/// order is carried along so peer keys can be checked for subgroup membership.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainParameters {
    modulus: BigUint,
    generator: BigUint,
    subgroup_order: Option<BigUint>,
}

impl DomainParameters {
    /// Wraps a modulus and generator. Invariants are checked by [`validate`](Self::validate).
    pub fn new(modulus: BigUint, generator: BigUint) -> Self {
        Self {
            modulus,
            generator,
            subgroup_order: None,
        }
    }

    /// Like [`new`](Self::new), recording the order of the subgroup `generator` spans.
    pub fn with_subgroup_order(modulus: BigUint, generator: BigUint, order: BigUint) -> Self {
        Self {
            modulus,
            generator,
            subgroup_order: Some(order),
        }
    }

    /// The 2048-bit MODP group from RFC 3526: safe prime, generator 2 of order (p-1)/2.
    pub fn rfc3526_group14() -> Self {
        let p = BigUint::parse_bytes(RFC3526_GROUP14_P.as_bytes(), 16)
            .expect("RFC 3526 group 14 modulus is valid hex");
        let q = &p >> 1;
        Self::with_subgroup_order(p, BigUint::from(2u8), q)
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    pub fn subgroup_order(&self) -> Option<&BigUint> {
        self.subgroup_order.as_ref()
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// Width in bytes of a fixed-size encoding of any element mod p.
    pub fn byte_len(&self) -> usize {
        self.modulus.bits().div_ceil(8) as usize
    }

    /// Checks `p >= 5`, `p` odd, `1 < g < p-1`, and `g^q = 1` when `q` is known.
    ///
    /// `g = p-1` is refused along with the out-of-range values: it has order 2, so every
    /// public key it produced would be rejected by the peer.
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        let one = BigUint::one();
        let p = &self.modulus;

        if *p < BigUint::from(5u8) {
            return Err(InvalidConfigurationError::ModulusTooSmall);
        }
        if p.is_even() {
            return Err(InvalidConfigurationError::ModulusEven);
        }

        let p_minus_1 = p - &one;
        if self.generator <= one || self.generator >= p_minus_1 {
            return Err(InvalidConfigurationError::GeneratorOutOfRange);
        }

        if let Some(q) = &self.subgroup_order {
            if q.is_zero() || self.generator.modpow(q, p) != one {
                return Err(InvalidConfigurationError::SubgroupOrderMismatch);
            }
        }
        Ok(())
    }

    /// Short identifier for logs: bit length and the leading bytes of p in hex.
    pub fn fingerprint(&self) -> String {
        let bytes = self.modulus.to_bytes_be();
        let head = &bytes[..bytes.len().min(8)];
        format!("{}-bit p={}...", self.bits(), hex::encode(head))
    }

    /// Serializes as three u32 length-prefixed big-endian fields: p, g, q (empty when unknown).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * self.byte_len() + 12);
        write_length_prefixed(&mut out, &self.modulus);
        write_length_prefixed(&mut out, &self.generator);
        match &self.subgroup_order {
            Some(q) => write_length_prefixed(&mut out, q),
            None => write_length_prefixed_bytes(&mut out, &[]),
        }
        out
    }

    /// Parses the output of [`to_bytes`](Self::to_bytes) and validates the result.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = bytes;
        let modulus = read_length_prefixed(&mut cursor)?;
        let generator = read_length_prefixed(&mut cursor)?;
        let order_bytes = read_length_prefixed_bytes(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(EncodingError::TrailingBytes(cursor.len()).into());
        }

        let params = if order_bytes.is_empty() {
            Self::new(modulus, generator)
        } else {
            let order = BigUint::from_bytes_be(order_bytes);
            Self::with_subgroup_order(modulus, generator, order)
        };
        params.validate()?;
        Ok(params)
    }
}

impl fmt::Display for DomainParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g: {}, p: {}", self.generator, self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(p: u32, g: u32) -> DomainParameters {
        DomainParameters::new(BigUint::from(p), BigUint::from(g))
    }

    #[test]
    fn group14_is_well_formed() {
        let group = DomainParameters::rfc3526_group14();
        assert_eq!(group.bits(), 2048);
        assert_eq!(group.byte_len(), 256);
        assert_eq!(group.generator(), &BigUint::from(2u8));
        assert!(group.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        assert_eq!(params(3, 2).validate(), Err(InvalidConfigurationError::ModulusTooSmall));
        assert_eq!(params(24, 5).validate(), Err(InvalidConfigurationError::ModulusEven));
        assert_eq!(params(23, 1).validate(), Err(InvalidConfigurationError::GeneratorOutOfRange));
        assert_eq!(params(23, 22).validate(), Err(InvalidConfigurationError::GeneratorOutOfRange));
        assert_eq!(params(23, 23).validate(), Err(InvalidConfigurationError::GeneratorOutOfRange));
        assert_eq!(params(23, 0).validate(), Err(InvalidConfigurationError::GeneratorOutOfRange));
        assert!(params(23, 5).validate().is_ok());
    }

    #[test]
    fn validate_checks_declared_subgroup_order() {
        // 23 = 2*11 + 1; 4 is a square so it has order 11, 5 is a primitive root
        let with_order = |g: u32| {
            DomainParameters::with_subgroup_order(
                BigUint::from(23u32),
                BigUint::from(g),
                BigUint::from(11u32),
            )
        };
        let good = with_order(4);
        assert!(good.validate().is_ok());

        let bad = with_order(5);
        assert_eq!(bad.validate(), Err(InvalidConfigurationError::SubgroupOrderMismatch));
    }

    #[test]
    fn bytes_round_trip_keeps_subgroup_order() {
        let group = DomainParameters::rfc3526_group14();
        assert_eq!(DomainParameters::from_bytes(&group.to_bytes()).unwrap(), group);

        let plain = params(23, 5);
        let decoded = DomainParameters::from_bytes(&plain.to_bytes()).unwrap();
        assert_eq!(decoded.subgroup_order(), None);
    }

    #[test]
    fn from_bytes_rejects_invalid_parameters_and_trailing_data() {
        let bytes = params(23, 1).to_bytes();
        assert!(matches!(
            DomainParameters::from_bytes(&bytes),
            Err(Error::InvalidConfiguration(InvalidConfigurationError::GeneratorOutOfRange))
        ));

        let mut bytes = params(23, 5).to_bytes();
        bytes.push(0);
        assert!(matches!(
            DomainParameters::from_bytes(&bytes),
            Err(Error::Encoding(EncodingError::TrailingBytes(1)))
        ));
    }

    #[test]
    fn display_mentions_generator_and_size() {
        let shown = params(23, 5).to_string();
        assert!(shown.starts_with("g: 5, p: 5-bit p=17"));
    }
}
