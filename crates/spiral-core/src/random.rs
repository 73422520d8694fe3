#![forbid(unsafe_code)]

//! Injectable randomness.
//!
//! Everything random in the animation (colors, sizes, branch rolls) draws
//! from a [`RandomSource`], so tests can pin the outcome with a
//! [`ConstantSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::PackedRgba;

/// Lower bound of a path's size multiplier.
pub const SIZE_MIN: f64 = 0.30;
/// Upper bound of a path's size multiplier.
pub const SIZE_MAX: f64 = 0.34;

/// Uniform source of values in `[0, 1]`.
pub trait RandomSource {
    /// Next uniform value. Implementations should stay within `[0, 1]`.
    fn next_unit(&mut self) -> f64;
}

/// [`RandomSource`] backed by a seedable [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic source for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Source that returns the same value forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource(pub f64);

impl RandomSource for ConstantSource {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Three independent channels, each uniform in `[0, 255]`; alpha is 255.
pub fn random_color(random: &mut dyn RandomSource) -> PackedRgba {
    let mut channel = || (random.next_unit() * 256.0).floor().clamp(0.0, 255.0) as u8;
    let r = channel();
    let g = channel();
    let b = channel();
    PackedRgba::rgb(r, g, b)
}

/// Size multiplier uniform in `[SIZE_MIN, SIZE_MAX]`.
pub fn random_size(random: &mut dyn RandomSource) -> f64 {
    let u = random.next_unit().clamp(0.0, 1.0);
    SIZE_MIN + u * (SIZE_MAX - SIZE_MIN)
}

/// Returns -1, 0, or +1. NaN maps to 0.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_convention() {
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.01), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(f64::NAN), 0.0);
    }

    #[test]
    fn size_bounds() {
        assert_eq!(random_size(&mut ConstantSource(0.0)), SIZE_MIN);
        assert!((random_size(&mut ConstantSource(1.0)) - SIZE_MAX).abs() < 1e-12);
        let mut rng = SeededRandom::from_seed(7);
        for _ in 0..1000 {
            let s = random_size(&mut rng);
            assert!((SIZE_MIN..=SIZE_MAX).contains(&s), "size {s} out of range");
        }
    }

    #[test]
    fn color_extremes() {
        assert_eq!(random_color(&mut ConstantSource(0.0)), PackedRgba::rgb(0, 0, 0));
        assert_eq!(
            random_color(&mut ConstantSource(1.0)),
            PackedRgba::rgb(255, 255, 255)
        );
        assert_eq!(
            random_color(&mut ConstantSource(0.5)),
            PackedRgba::rgb(128, 128, 128)
        );
    }

    #[test]
    fn seeded_is_deterministic() {
        let mut a = SeededRandom::from_seed(42);
        let mut b = SeededRandom::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn seeded_stays_in_unit_range() {
        let mut rng = SeededRandom::from_seed(1);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
