//! Random sources for the node initializer.
//!
//! The initializer only needs uniform samples in [0, 1), so it takes any
//! [`RandomSource`]. [`Xorshift64`] is the default: seedable and identical
//! across platforms, which lets the CLI reproduce a field from a seed.

/// A source of uniform samples in [0, 1).
pub trait RandomSource {
    /// Next sample in [0, 1).
    fn unit(&mut self) -> f64;

    /// Next sample in [min, max).
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit() * (max - min)
    }
}

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A zero seed is a fixed point of the algorithm and is replaced by a
/// non-zero fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Seeds the generator; zero maps to a fixed non-zero seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns it.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits over 2^53, so every value is exactly representable.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
