//! Big-endian byte encodings for values exchanged between participants.
//!
//! Two shapes are supported: fixed width (public keys, padded to the modulus length)
//! and u32 length-prefixed (parameter sets whose sizes are not known in advance).

use crate::error::EncodingError;
use num_bigint::BigUint;

const LENGTH_PREFIX: usize = 4;

/// Left-pads `bytes` with zeros up to `width`. Longer inputs are returned unchanged.
fn pad_to_width(bytes: Vec<u8>, width: usize) -> Vec<u8> {
    if bytes.len() >= width {
        return bytes;
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    out
}

/// Encodes `value` as exactly `width` big-endian bytes.
pub fn to_fixed_be(value: &BigUint, width: usize) -> Result<Vec<u8>, EncodingError> {
    let raw = value.to_bytes_be();
    // to_bytes_be renders zero as a single 0x00
    let needed = if value.bits() == 0 { 0 } else { raw.len() };
    if needed > width {
        return Err(EncodingError::ValueTooLarge { needed, width });
    }
    if needed == 0 {
        return Ok(vec![0u8; width]);
    }
    Ok(pad_to_width(raw, width))
}

/// Decodes exactly `width` big-endian bytes.
pub fn from_fixed_be(bytes: &[u8], width: usize) -> Result<BigUint, EncodingError> {
    if bytes.len() != width {
        return Err(EncodingError::LengthMismatch {
            expected: width,
            actual: bytes.len(),
        });
    }
    Ok(BigUint::from_bytes_be(bytes))
}

/// Appends `value` to `out` as a u32 length followed by its minimal big-endian bytes.
/// Zero is written with length 0.
pub fn write_length_prefixed(out: &mut Vec<u8>, value: &BigUint) {
    let raw = if value.bits() == 0 {
        Vec::new()
    } else {
        value.to_bytes_be()
    };
    write_length_prefixed_bytes(out, &raw);
}

pub(crate) fn write_length_prefixed_bytes(out: &mut Vec<u8>, raw: &[u8]) {
    out.extend_from_slice(&(raw.len() as u32).to_be_bytes());
    out.extend_from_slice(raw);
}

/// Reads one length-prefixed field from the front of `input`, advancing it.
pub fn read_length_prefixed(input: &mut &[u8]) -> Result<BigUint, EncodingError> {
    read_length_prefixed_bytes(input).map(BigUint::from_bytes_be)
}

pub(crate) fn read_length_prefixed_bytes<'a>(
    input: &mut &'a [u8],
) -> Result<&'a [u8], EncodingError> {
    if input.len() < LENGTH_PREFIX {
        return Err(EncodingError::Truncated {
            needed: LENGTH_PREFIX,
            available: input.len(),
        });
    }
    let (prefix, rest) = input.split_at(LENGTH_PREFIX);
    let len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if rest.len() < len {
        return Err(EncodingError::Truncated {
            needed: len,
            available: rest.len(),
        });
    }
    let (field, rest) = rest.split_at(len);
    *input = rest;
    Ok(field)
}
