//! Random number generator workloads.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAX: u32 = 1_000_000;

pub fn thread_rng_basic(limit: u64) -> u32 {
    let mut rng = rand::thread_rng();
    let mut x = 0;
    for _ in 0..limit {
        x = rng.gen_range(0..=MAX);
    }
    x
}

pub fn chacha_seeded(limit: u64) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(limit);
    let mut x = 0;
    for _ in 0..limit {
        x = rng.gen_range(0..=MAX);
    }
    x
}

/// Draws straight from the operating system's CSPRNG every iteration.
pub fn os_rng(limit: u64) -> u32 {
    let mut x = 0;
    for _ in 0..limit {
        x = OsRng.gen_range(0..=MAX);
    }
    x
}

pub fn random_bytes(limit: u64) -> [u8; 32] {
    let mut x = [0u8; 32];
    for _ in 0..limit {
        OsRng.fill_bytes(&mut x);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_range() {
        assert!(thread_rng_basic(50) <= MAX);
        assert!(os_rng(50) <= MAX);
        assert_eq!(thread_rng_basic(0), 0);
    }

    #[test]
    fn chacha_is_reproducible() {
        assert_eq!(chacha_seeded(100), chacha_seeded(100));
        assert!(chacha_seeded(100) <= MAX);
    }

    #[test]
    fn random_bytes_are_filled() {
        assert_eq!(random_bytes(0), [0u8; 32]);
        // 2^-256 chance of a false failure.
        assert_ne!(random_bytes(2), [0u8; 32]);
    }
}
