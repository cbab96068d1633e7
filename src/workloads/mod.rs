//! Built-in workloads.
//!
//! Each workload takes its iteration count and returns whatever it computed;
//! the harness keeps that value opaque and drops it before measuring memory.

use crate::config::Profile;
use crate::registry::Registry;

pub mod alloc;
pub mod collections;
pub mod crypto;
pub mod io;
pub mod math;
pub mod objects;
pub mod random;
pub mod text;

/// Registers every built-in workload, scaled for `profile`.
pub fn register_all(registry: &mut Registry, profile: Profile) {
    let n = |iterations: u64| profile.scale(iterations);

    registry.add_test("Math (Trigonometry & Powers)", n(200_000), math::trigonometry);
    registry.add_test(
        "Heavy Geometry (Mesh Projections)",
        n(20_000),
        math::mesh_projection,
    );
    registry.add_fallible_test(
        "String (Manipulation & Regex)",
        n(20_000),
        text::manipulation,
    );
    registry.add_test("Loops & Logic (Heavy Branching)", n(50_000), math::branching);
    registry.add_test(
        "Object (Instantiation & Dynamic Dispatch)",
        n(600_000),
        objects::dynamic_dispatch,
    );
    registry.add_test("Arrays (Creation & Sorting)", n(10_000), collections::sort_and_flip);
    registry.add_test(
        "Data Processing (Filter & Sort)",
        n(10_000),
        collections::filter_and_sort,
    );
    registry.add_test("Recursion (Heavy Call Stack)", n(1_000_000), math::recursion);
    registry.add_test("Hashing (SHA-256 & Key Stretching)", n(20_000), crypto::hashing);
    registry.add_fallible_test("JSON & Serialization", n(100_000), text::serialization);
    registry.add_test("Rand::thread_rng (Basic)", n(100_000), random::thread_rng_basic);
    registry.add_test("Rand::ChaCha8 (Seeded)", n(100_000), random::chacha_seeded);
    registry.add_test("Rand::OsRng (CSPRNG)", n(100_000), random::os_rng);
    registry.add_test("Rand::random_bytes", n(100_000), random::random_bytes);
    registry.add_fallible_test("IO::File Write", n(10_000), io::file_write);
    registry.add_fallible_test("IO::File Read", n(10_000), io::file_read);
    registry.add_test("Memory (Allocation & Churn)", n(50_000), alloc::allocation_churn);
}
