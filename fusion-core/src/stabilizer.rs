// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Temporal stabilizer — asymmetric per-emotion filter against the previous
//! fused vector.
//!
//! Rises follow an exponential moving average (`alpha` controls adoption
//! speed). Falls decay geometrically by `decay_rate` per tick but never drop
//! below the new reading, so a signal that briefly disappears fades out
//! instead of snapping to zero.

use crate::config::FusionConfig;
use crate::vector::{finite_or_zero, EmotionVector};

/// Filter a single score.
#[inline]
pub fn smooth_value(current: f32, previous: f32, alpha: f32, decay_rate: f32) -> f32 {
    let current = finite_or_zero(current);
    let previous = finite_or_zero(previous);
    if current >= previous {
        alpha * current + (1.0 - alpha) * previous
    } else {
        current.max(previous * decay_rate)
    }
}

/// Filter every canonical emotion independently.
pub fn smooth(
    current: &EmotionVector,
    previous: &EmotionVector,
    cfg: &FusionConfig,
) -> EmotionVector {
    current.map(|e, c| smooth_value(c, previous.get(e), cfg.smoothing_alpha, cfg.decay_rate))
}
