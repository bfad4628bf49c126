//! Jitter sources for the spring simulation's initial ring.
//!
//! The simulation never reaches for an ambient random source; callers hand it a
//! [`JitterSource`], which keeps layouts reproducible for a given seed and lets tests pin the
//! jitter to a constant.

/// Supplies perturbation samples in `[-1, 1)`.
pub trait JitterSource {
    fn next_signed(&mut self) -> f64;
}

/// xorshift64* generator. Cheap, seedable, and stable across platforms.
#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Map to [0, 1) with 53 bits of precision.
    pub fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }
}

impl JitterSource for XorShift64Star {
    fn next_signed(&mut self) -> f64 {
        (self.next_f64_unit() * 2.0) - 1.0
    }
}

/// Always returns the same sample. Intended for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantJitter(pub f64);

impl JitterSource for ConstantJitter {
    fn next_signed(&mut self) -> f64 {
        self.0
    }
}
