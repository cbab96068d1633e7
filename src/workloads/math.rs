//! Floating-point, branching and call-stack workloads.

use std::f64::consts::PI;
use std::hint::black_box;

pub fn trigonometry(limit: u64) -> f64 {
    let mut r = 0.0;
    for i in 0..limit {
        let x = i as f64;
        let b = i % 7;
        black_box(i * 2 + i);
        r = x.sin() * x.cos();
        black_box(x.tan());
        black_box(x.atan());
        black_box(((i >> 2) as f64).powi(2));
        black_box(x.sqrt());
        black_box(x.hypot(b as f64));
        black_box((x + 1.0).ln());
        black_box((b as f64).exp());
        black_box((i as i64 - limit as i64).abs());
        black_box((x / PI).ceil());
        black_box((x / PI).floor());
        black_box((x / PI).round());
        black_box(x.is_finite());
        black_box(x.is_nan());
    }
    r
}

#[derive(Clone, Copy, Debug)]
struct Vertex {
    x: f64,
    y: f64,
    z: f64,
}

/// Rotates a 20-vertex mesh a little each iteration and accumulates the area
/// of its projected bounding box.
pub fn mesh_projection(limit: u64) -> f64 {
    let mut mesh: Vec<Vertex> = (0..20)
        .map(|v| {
            let v = v as f64;
            Vertex {
                x: v.sin(),
                y: v.cos(),
                z: v * 0.1,
            }
        })
        .collect();

    let mut accumulated_area = 0.0;
    for i in 0..limit {
        let angle = i as f64 * 0.0001;
        let (sin_a, cos_a) = angle.sin_cos();

        let (mut min_x, mut max_x) = (9999.0_f64, -9999.0_f64);
        let (mut min_y, mut max_y) = (9999.0_f64, -9999.0_f64);

        for vertex in mesh.iter_mut() {
            let rx = vertex.x * cos_a - vertex.z * sin_a;
            let rz = vertex.x * sin_a + vertex.z * cos_a;
            let ry = vertex.y * cos_a - rz * sin_a;
            let rz2 = vertex.y * sin_a + rz * cos_a;

            *vertex = Vertex {
                x: rx,
                y: ry,
                z: rz2,
            };

            let perspective = rz2 + 5.0;
            let px = rx / perspective;
            let py = ry / perspective;

            min_x = min_x.min(px);
            max_x = max_x.max(px);
            min_y = min_y.min(py);
            max_y = max_y.max(py);
        }

        accumulated_area += (max_x - min_x) * (max_y - min_y);
    }
    accumulated_area
}

pub fn branching(limit: u64) -> f64 {
    let mut x: i64 = 1;
    let mut y: f64 = 0.0;

    for i in 1..=limit as i64 {
        for j in 0..25_i64 {
            if (i % 2 == 0 && x % 3 != 0) || j % 7 == 0 {
                x ^= j << 1;
            } else if (j % 5 == 0) ^ (x > 10_000) {
                x = x.wrapping_mul(3).wrapping_add(1);
            } else {
                x = x.wrapping_add(i >> 2);
            }

            match (x ^ j).wrapping_abs() % 5 {
                0 => y += i as f64,
                1 | 2 => y -= j as f64 * 0.5,
                3 => x = !x,
                _ => y = ((y as i64) ^ x) as f64,
            }

            if !(-1_000_000..=1_000_000).contains(&x) {
                x %= 10_000;
            }
        }
    }
    x as f64 + y
}

fn heavy_recurse(depth: u32, x: i64, y: i64) -> i64 {
    if depth == 0 {
        return x + y;
    }
    heavy_recurse(depth - 1, x + 1, y) + heavy_recurse(depth - 1, x, y + 1)
}

/// Binary recursion of depth 5; `limit` is the total number of leaf calls.
pub fn recursion(limit: u64) -> i64 {
    const DEPTH: u32 = 5;
    let calls_per_loop = 1u64 << DEPTH;
    let loops = limit / calls_per_loop;

    let mut result = 0i64;
    for i in 0..loops {
        result = result.wrapping_add(heavy_recurse(black_box(DEPTH), i as i64, 1));
    }
    result
}
