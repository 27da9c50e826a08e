//! Miller-Rabin primality testing and prime search, with a thread-pool
//! variant that races several candidate streams and returns the first hit.

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_core::CryptoRng;
use std::sync::mpsc;
use std::thread;

use crate::numtheory::bit_size;
use crate::randnum::{randint, read_random_odd_int};

fn two() -> BigUint {
    BigUint::from(2u32)
}
fn three() -> BigUint {
    BigUint::from(3u32)
}

/// Minimum number of Miller-Rabin rounds for an error probability of
/// `2^-100`, per FIPS 186-4 Table C.3.
pub fn rounds_for(nbits: u64) -> usize {
    if nbits >= 1536 {
        3
    } else if nbits >= 1024 {
        4
    } else if nbits >= 512 {
        7
    } else {
        10
    }
}

/// Classical Miller-Rabin primality test. `n < 2` or even `n > 2` are
/// rejected outright; `n` in `{2, 3}` is accepted as prime without testing.
pub fn miller_rabin<R: RngCore + CryptoRng>(rng: &mut R, n: &BigUint, k: usize) -> bool {
    if n == &two() || n == &three() {
        return true;
    }
    if n < &two() || n % 2u32 == BigUint::from(0u32) {
        return false;
    }

    let one = BigUint::from(1u32);
    let n_minus_1 = n - &one;
    let (mut r, mut s) = (0u64, n_minus_1.clone());
    while &s % 2u32 == BigUint::from(0u32) {
        r += 1;
        s /= 2u32;
    }

    // witness a drawn uniformly from [2, n-2]: sample t in [1, n-3] and
    // shift by 1.
    let span = n - &three();
    'witness: for _ in 0..k {
        let a = randint(rng, &span) + &one;
        let mut x = a.modpow(&s, n);

        if x == one || x == n_minus_1 {
            continue;
        }

        for _ in 0..r.saturating_sub(1) {
            x = x.modpow(&two(), n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// `true` if `number` is prime.
pub fn is_prime<R: RngCore + CryptoRng>(rng: &mut R, number: &BigUint) -> bool {
    if number < &two() {
        return false;
    }
    if number == &two() {
        return true;
    }
    if number % 2u32 == BigUint::from(0u32) {
        return false;
    }

    let nbits = bit_size(&num_bigint::BigInt::from(number.clone()));
    miller_rabin(rng, number, rounds_for(nbits))
}

/// Draws an odd, full-width `nbits`-bit integer and returns it as soon as
/// it passes primality testing. Terminates with probability 1 under a
/// sound RNG.
pub fn getprime<R: RngCore + CryptoRng>(rng: &mut R, nbits: u64) -> BigUint {
    loop {
        let candidate = read_random_odd_int(rng, nbits);
        if is_prime(rng, &candidate) {
            return candidate;
        }
    }
}

/// Parallel prime search: spawns `poolsize` worker threads, each with
/// independent RNG state seeded from OS randomness (never sharing a stream
/// across threads), and returns the first prime produced by any of them.
///
/// The remaining workers are detached rather than hard-killed (Rust has no
/// portable thread-kill); once a result is received, the channel receiver
/// is dropped and any later sends from stragglers simply fail silently.
pub fn getprime_parallel(nbits: u64, poolsize: usize) -> BigUint {
    let poolsize = poolsize.max(1);
    let (tx, rx) = mpsc::channel::<BigUint>();

    for _ in 0..poolsize {
        let tx = tx.clone();
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        thread::spawn(move || {
            let mut worker_rng = rand::rngs::StdRng::from_seed(seed);
            let prime = getprime(&mut worker_rng, nbits);
            let _ = tx.send(prime);
        });
    }
    drop(tx);

    rx.recv().expect("at least one worker thread runs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn rounds_for_scenarios() {
        assert_eq!(rounds_for(1536), 3);
        assert_eq!(rounds_for(1024), 4);
        assert_eq!(rounds_for(512), 7);
        assert_eq!(rounds_for(256), 10);
    }

    #[test]
    fn is_prime_scenarios() {
        let mut rng = OsRng;
        assert!(is_prime(&mut rng, &BigUint::from(2u32)));
        assert!(!is_prime(&mut rng, &BigUint::from(42u32)));
        assert!(is_prime(&mut rng, &BigUint::from(41u32)));
    }

    #[test]
    fn getprime_has_exact_bit_length() {
        let mut rng = OsRng;
        let p = getprime(&mut rng, 128);
        assert_eq!(bit_size(&num_bigint::BigInt::from(p.clone())), 128);
        assert!(is_prime(&mut rng, &p));
    }

    #[test]
    fn getprime_parallel_has_exact_bit_length() {
        let p = getprime_parallel(96, 3);
        assert_eq!(bit_size(&num_bigint::BigInt::from(p.clone())), 96);
        let mut rng = OsRng;
        assert!(is_prime(&mut rng, &p));
    }
}
