// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Composite emotions — fixed weighted combinations of normalized base
//! emotions from both modalities.
//!
//! Each contributing term is clipped to [0, 1] before weighting and every
//! composite is capped at `caps.composite`, so a derived signal never
//! saturates the profile.

use crate::config::FusionConfig;
use crate::normalizer::BaseSignals;
use crate::registry::{Emotion, COMPOSITE_COUNT};

/// `(base emotion, weight, inverted)` — inverted terms contribute `1 - value`.
type Term = (Emotion, f32, bool);

/// Recipe for one composite emotion.
pub struct CompositeRecipe {
    pub emotion: Emotion,
    pub terms: &'static [Term],
}

/// All composite recipes, in registry order.
pub const RECIPES: [CompositeRecipe; COMPOSITE_COUNT] = [
    CompositeRecipe {
        emotion: Emotion::Receptiveness,
        terms: &[
            (Emotion::Engaged, 0.3, false),
            (Emotion::Happy, 0.25, false),
            (Emotion::Interested, 0.2, false),
        ],
    },
    CompositeRecipe {
        emotion: Emotion::Awareness,
        terms: &[
            (Emotion::Surprise, 0.25, false),
            (Emotion::Interested, 0.25, false),
            (Emotion::Engaged, 0.25, false),
        ],
    },
    CompositeRecipe {
        emotion: Emotion::Trust,
        terms: &[
            (Emotion::Calm, 0.25, false),
            (Emotion::Happy, 0.2, false),
            (Emotion::Confident, 0.25, false),
        ],
    },
    CompositeRecipe {
        emotion: Emotion::Anticipation,
        terms: &[
            (Emotion::Excited, 0.3, false),
            (Emotion::Curious, 0.25, false),
            (Emotion::Surprise, 0.2, false),
        ],
    },
    CompositeRecipe {
        emotion: Emotion::Relaxed,
        terms: &[(Emotion::Calm, 0.35, false), (Emotion::Neutral, 0.3, false)],
    },
    CompositeRecipe {
        emotion: Emotion::Skeptical,
        terms: &[(Emotion::Confused, 0.4, false), (Emotion::Neutral, 0.2, false)],
    },
    CompositeRecipe {
        emotion: Emotion::Distracted,
        terms: &[
            (Emotion::Engaged, 0.25, true),
            (Emotion::Bored, 0.25, false),
            (Emotion::Neutral, 0.15, false),
        ],
    },
    CompositeRecipe {
        emotion: Emotion::Enthusiastic,
        terms: &[(Emotion::Excited, 0.4, false), (Emotion::Happy, 0.3, false)],
    },
    CompositeRecipe {
        emotion: Emotion::Contemplative,
        terms: &[(Emotion::Neutral, 0.25, false), (Emotion::Interested, 0.4, false)],
    },
    CompositeRecipe {
        emotion: Emotion::Alert,
        terms: &[(Emotion::Surprise, 0.4, false), (Emotion::Engaged, 0.3, false)],
    },
];

impl CompositeRecipe {
    /// Weighted sum of the recipe's terms, capped at `cap`.
    pub fn evaluate(&self, base: &BaseSignals, cap: f32) -> f32 {
        let sum: f32 = self
            .terms
            .iter()
            .map(|&(emotion, weight, inverted)| {
                let v = base.get(emotion).clamp(0.0, 1.0);
                let v = if inverted { 1.0 - v } else { v };
                weight * v
            })
            .sum();
        sum.min(cap)
    }
}

/// Derive all composites from one tick's normalized base signals.
///
/// Visual terms read the boosted video scores; vocal terms read whichever
/// vocal source the normalizer selected (real audio or fallback synthesis).
pub fn derive_composites(base: &BaseSignals, cfg: &FusionConfig) -> [f32; COMPOSITE_COUNT] {
    let mut out = [0.0; COMPOSITE_COUNT];
    for (slot, recipe) in out.iter_mut().zip(RECIPES.iter()) {
        *slot = recipe.evaluate(base, cfg.caps.composite);
    }
    out
}
