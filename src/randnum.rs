//! Cryptographic random byte and integer generation.
//!
//! Generic over any `rand_core::CryptoRng + RngCore` so callers can plug in
//! `OsRng` directly or a per-worker seeded `StdRng` for parallel prime
//! search (see `crate::primes`).

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::numtheory::bit_size;
use crate::transform::bytes2int;

/// Reads `nbits` random bits, returned as exactly `ceil(nbits/8)` bytes.
///
/// If `nbits` isn't a whole number of bytes, the high-order byte has its
/// upper `8 - nbits % 8` bits masked to zero, so the value fits in `nbits`
/// bits. This does **not** force the top bit to 1 — see
/// [`read_random_odd_int`] for the tightened variant used by prime search.
pub fn read_random_bits<R: RngCore + CryptoRng>(rng: &mut R, nbits: u64) -> Vec<u8> {
    let nbytes = (nbits / 8) as usize;
    let rbits = nbits % 8;

    let mut buf = vec![0u8; nbytes + if rbits > 0 { 1 } else { 0 }];
    rng.fill_bytes(&mut buf);

    if rbits > 0 {
        let mask = (1u16 << rbits) as u8 - 1;
        let last = buf.len() - 1;
        buf[last] &= mask;
    }

    buf
}

/// Reads a random integer of approximately `nbits` bits.
pub fn read_random_int<R: RngCore + CryptoRng>(rng: &mut R, nbits: u64) -> BigUint {
    bytes2int(&read_random_bits(rng, nbits))
}

/// Reads a random odd integer of approximately `nbits` bits, with both the
/// top and bottom bits forced to 1 so the result always occupies exactly
/// `nbits` bits, matching typical RSA prime-generation practice.
pub fn read_random_odd_int<R: RngCore + CryptoRng>(rng: &mut R, nbits: u64) -> BigUint {
    let mut value = read_random_int(rng, nbits);
    value.set_bit(0, true);
    if nbits > 0 {
        value.set_bit(nbits - 1, true);
    }
    value
}

/// Returns a random integer `x` with `1 <= x <= maxvalue`, by rejection
/// sampling `bit_size(maxvalue)` bits until the draw falls in range.
pub fn randint<R: RngCore + CryptoRng>(rng: &mut R, maxvalue: &BigUint) -> BigUint {
    let bits = bit_size(&num_bigint::BigInt::from(maxvalue.clone()));
    loop {
        let value = read_random_int(rng, bits);
        if !value.eq(&BigUint::from(0u32)) && &value <= maxvalue {
            return value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn read_random_bits_masks_high_byte() {
        let mut rng = OsRng;
        for _ in 0..64 {
            let bytes = read_random_bits(&mut rng, 10);
            assert_eq!(bytes.len(), 2);
            assert!(bytes[0] <= 0x03);
        }
    }

    #[test]
    fn read_random_bits_whole_bytes() {
        let mut rng = OsRng;
        let bytes = read_random_bits(&mut rng, 16);
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn read_random_odd_int_is_odd_and_full_width() {
        let mut rng = OsRng;
        for _ in 0..32 {
            let v = read_random_odd_int(&mut rng, 64);
            assert_eq!(&v & BigUint::from(1u32), BigUint::from(1u32));
            assert_eq!(crate::numtheory::bit_size(&num_bigint::BigInt::from(v)), 64);
        }
    }

    #[test]
    fn randint_stays_in_bounds() {
        let mut rng = OsRng;
        let max = BigUint::from(100u32);
        for _ in 0..200 {
            let v = randint(&mut rng, &max);
            assert!(v >= BigUint::from(1u32) && v <= max);
        }
    }
}
