// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Anti-stagnation jitter and final bounding.
//!
//! Active emotions get a small uniform perturbation each tick so a converged
//! value never sits visibly frozen on the dashboard, then the vector is
//! clipped to [0, 1] and capped at `caps.final_cap`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FusionConfig;
use crate::vector::{finite_or_zero, EmotionVector};

/// Source of jitter samples. Injectable so tests can run deterministically.
pub trait JitterSource: Send {
    /// A sample uniformly distributed in `[-amplitude, amplitude]`.
    fn sample(&mut self, amplitude: f32) -> f32;
}

/// Jitter drawn from a `rand` generator.
pub struct RandomJitter<R: Rng + Send = StdRng> {
    rng: R,
}

impl RandomJitter<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> RandomJitter<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> JitterSource for RandomJitter<R> {
    fn sample(&mut self, amplitude: f32) -> f32 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..=amplitude)
    }
}

/// Always returns zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self, _amplitude: f32) -> f32 {
        0.0
    }
}

/// Build the jitter source a config asks for.
pub fn jitter_for(cfg: &FusionConfig) -> Box<dyn JitterSource> {
    if !cfg.jitter.is_enabled() {
        return Box::new(NoJitter);
    }
    match cfg.seed {
        Some(seed) => Box::new(RandomJitter::seeded(seed)),
        None => Box::new(RandomJitter::from_entropy()),
    }
}

/// Perturb active emotions, clip, and cap.
pub fn finalize(
    vector: &EmotionVector,
    jitter: &mut dyn JitterSource,
    cfg: &FusionConfig,
) -> EmotionVector {
    let j = &cfg.jitter;
    let final_cap = cfg.caps.final_cap;

    vector.map(|_, v| {
        let mut v = finite_or_zero(v);
        if v > j.activity_threshold {
            v = finite_or_zero(v + jitter.sample(j.amplitude)).clamp(0.0, j.ceiling);
        }
        let v = v.clamp(0.0, 1.0);
        if v > final_cap {
            final_cap
        } else {
            v
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Emotion;

    /// Returns a fixed offset regardless of amplitude.
    struct Fixed(f32);

    impl JitterSource for Fixed {
        fn sample(&mut self, _amplitude: f32) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_random_jitter_bounded() {
        let mut jitter = RandomJitter::seeded(42);
        for _ in 0..10_000 {
            let s = jitter.sample(0.01);
            assert!((-0.01..=0.01).contains(&s));
        }
        assert_eq!(jitter.sample(0.0), 0.0);
    }

    #[test]
    fn test_seeded_jitter_reproducible() {
        let mut a = RandomJitter::seeded(9);
        let mut b = RandomJitter::seeded(9);
        for _ in 0..100 {
            assert_eq!(a.sample(0.01), b.sample(0.01));
        }
    }

    #[test]
    fn test_with_rng_matches_seeded() {
        let mut a = RandomJitter::with_rng(StdRng::seed_from_u64(31));
        let mut b = RandomJitter::seeded(31);
        for _ in 0..50 {
            assert_eq!(a.sample(0.01), b.sample(0.01));
        }
    }

    #[test]
    fn test_inactive_emotions_not_perturbed() {
        let cfg = FusionConfig::default();
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Happy, 0.05);
        v.set(Emotion::Sad, 0.3);
        let out = finalize(&v, &mut Fixed(0.01), &cfg);
        assert!((out.get(Emotion::Happy) - 0.05).abs() < f32::EPSILON);
        assert!((out.get(Emotion::Sad) - 0.31).abs() < 1e-6);
        assert_eq!(out.get(Emotion::Alert), 0.0);
    }

    #[test]
    fn test_final_cap() {
        let cfg = FusionConfig::default();
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Happy, 1.0);
        v.set(Emotion::Fear, 0.93);
        v.set(Emotion::Calm, 0.5);
        let out = finalize(&v, &mut NoJitter, &cfg);
        assert_eq!(out.get(Emotion::Happy), 0.92);
        assert_eq!(out.get(Emotion::Fear), 0.92);
        assert!((out.get(Emotion::Calm) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_and_non_finite_clipped() {
        let cfg = FusionConfig::default();
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Happy, -0.4);
        v.set(Emotion::Sad, f32::NAN);
        v.set(Emotion::Bored, f32::INFINITY);
        let out = finalize(&v, &mut Fixed(-0.01), &cfg);
        assert_eq!(out.get(Emotion::Happy), 0.0);
        assert_eq!(out.get(Emotion::Sad), 0.0);
        assert_eq!(out.get(Emotion::Bored), 0.0);
    }

    #[test]
    fn test_jitter_for_disabled() {
        let mut jitter = jitter_for(&FusionConfig::deterministic(1));
        assert_eq!(jitter.sample(0.01), 0.0);
    }
}
