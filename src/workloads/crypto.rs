//! Hashing workloads.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Key-stretching rounds per password hash.
pub const STRETCH_ROUNDS: u32 = 16;

fn hex32(d: [u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in d {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

/// Salted, iterated SHA-256 of `password`.
pub fn stretch_password(password: &[u8], salt: &[u8; 16], rounds: u32) -> [u8; 32] {
    let mut digest: [u8; 32] = Sha256::new()
        .chain_update(salt)
        .chain_update(password)
        .finalize()
        .into();
    for _ in 1..rounds {
        digest = Sha256::new()
            .chain_update(salt)
            .chain_update(digest)
            .finalize()
            .into();
    }
    digest
}

/// One SHA-256 per iteration, plus a salted password stretch every 500.
pub fn hashing(limit: u64) -> String {
    let mut rng = rand::thread_rng();
    let mut h = String::new();
    for i in 0..limit {
        let digest: [u8; 32] = Sha256::digest(format!("string to hash {i}").as_bytes()).into();
        h = hex32(digest);

        if i % 500 == 0 {
            let mut salt = [0u8; 16];
            rng.fill_bytes(&mut salt);
            std::hint::black_box(stretch_password(b"password", &salt, STRETCH_ROUNDS));
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_digest_is_hex_sha256() {
        // sha256("string to hash 0")
        let expected = hex32(Sha256::digest(b"string to hash 0").into());
        assert_eq!(hashing(1), expected);
        assert_eq!(hashing(1).len(), 64);
        assert_eq!(hashing(0), "");
    }

    #[test]
    fn stretching_depends_on_salt_and_rounds() {
        let salt_a = [1u8; 16];
        let salt_b = [2u8; 16];
        let a = stretch_password(b"password", &salt_a, STRETCH_ROUNDS);
        assert_eq!(a, stretch_password(b"password", &salt_a, STRETCH_ROUNDS));
        assert_ne!(a, stretch_password(b"password", &salt_b, STRETCH_ROUNDS));
        assert_ne!(a, stretch_password(b"password", &salt_a, STRETCH_ROUNDS + 1));
    }
}
