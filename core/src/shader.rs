// Shader-style scalar helpers shared by the lattice noises.
// Everything runs in f64 so the sin-hash stays stable for large coordinates.

const HASH_SCALE: f64 = 43758.5453;

#[inline]
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

// Hermite smoothstep with clamping, as in GLSL
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// Pseudo-random value in [0, 1) for a lattice point
#[inline]
pub fn hash1(x: f64, y: f64) -> f64 {
    fract((x * 12.9898 + y * 78.233).sin() * 43758.5453123)
}

// Three independent pseudo-random values in [0, 1) for a lattice point
#[inline]
pub fn hash3(x: f64, y: f64) -> [f64; 3] {
    [
        fract((x * 127.1 + y * 311.7).sin() * HASH_SCALE),
        fract((x * 269.5 + y * 183.3).sin() * HASH_SCALE),
        fract((x * 419.2 + y * 371.9).sin() * HASH_SCALE),
    ]
}
