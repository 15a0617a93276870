// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Base signal normalizer — maps the two raw classifier outputs onto the 18
//! base emotions, boosting scores and synthesizing vocal emotions from the
//! face when no speech signal is present.

use serde::{Deserialize, Serialize};

use crate::config::FusionConfig;
use crate::registry::{Emotion, EmotionClass, VISUAL_COUNT, VOCAL_COUNT};
use crate::vector::{read_raw, RawVector};

/// How vocal emotions were obtained for a tick. Recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMode {
    /// The speech classifier reported at least one non-zero score.
    AudioActive,
    /// No usable speech signal; vocal emotions synthesized from video.
    AudioFallback,
}

impl FusionMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::AudioActive => "audio_active",
            Self::AudioFallback => "audio_fallback",
        }
    }
}

/// True when any finite score in `raw` is non-zero. An empty mapping and an
/// all-zero mapping are both "no signal".
pub fn has_non_zero(raw: &RawVector) -> bool {
    raw.values().any(|&v| v.is_finite() && v != 0.0)
}

/// Normalized base-visual and base-vocal scores for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseSignals {
    pub visual: [f32; VISUAL_COUNT],
    pub vocal: [f32; VOCAL_COUNT],
}

impl BaseSignals {
    pub fn zeros() -> Self {
        Self {
            visual: [0.0; VISUAL_COUNT],
            vocal: [0.0; VOCAL_COUNT],
        }
    }

    /// Score of a base emotion. Composites read as `0.0`.
    pub fn get(&self, emotion: Emotion) -> f32 {
        match emotion.class() {
            EmotionClass::Visual => self.visual[emotion.index()],
            EmotionClass::Vocal => self.vocal[emotion.index() - VISUAL_COUNT],
            EmotionClass::Composite => 0.0,
        }
    }

    fn set(&mut self, emotion: Emotion, value: f32) {
        match emotion.class() {
            EmotionClass::Visual => self.visual[emotion.index()] = value,
            EmotionClass::Vocal => self.vocal[emotion.index() - VISUAL_COUNT] = value,
            EmotionClass::Composite => {}
        }
    }
}

/// Normalize one tick's raw readings and select the mode.
pub fn normalize(
    video: &RawVector,
    audio: &RawVector,
    cfg: &FusionConfig,
) -> (BaseSignals, FusionMode) {
    let boost = cfg.sensitivity_boost;
    let mut base = BaseSignals::zeros();

    for e in Emotion::VISUAL {
        base.set(e, boosted(read_raw(video, e.name()), boost));
    }

    let mode = if has_non_zero(audio) {
        FusionMode::AudioActive
    } else {
        FusionMode::AudioFallback
    };

    match mode {
        FusionMode::AudioActive => {
            for e in Emotion::VOCAL {
                base.set(e, boosted(read_raw(audio, e.name()), boost) * cfg.audio_weight);
            }
        }
        FusionMode::AudioFallback => {
            base.vocal = synthesize_vocal(video, cfg);
        }
    }

    (base, mode)
}

#[inline]
fn boosted(raw: f32, boost: f32) -> f32 {
    (raw * boost).min(1.0)
}

/// Vocal emotions estimated from facial expression alone, each capped at
/// `caps.fallback`. Reads raw (unboosted) video scores; the boost is applied
/// to each combination.
pub fn synthesize_vocal(video: &RawVector, cfg: &FusionConfig) -> [f32; VOCAL_COUNT] {
    let v = |e: Emotion| read_raw(video, e.name());
    let happy = v(Emotion::Happy);
    let sad = v(Emotion::Sad);
    let angry = v(Emotion::Angry);
    let fear = v(Emotion::Fear);
    let surprise = v(Emotion::Surprise);
    let disgust = v(Emotion::Disgust);
    let neutral = v(Emotion::Neutral);

    let boost = cfg.sensitivity_boost;
    let cap = cfg.caps.fallback;
    let f = |x: f32| (x * boost).min(cap);

    // Order matches Emotion::VOCAL.
    [
        f(neutral * 0.5 + (1.0 - angry) * 0.2), // calm
        f(happy * 0.6 + surprise * 0.3), // excited
        f(angry * 0.6 + disgust * 0.2), // frustrated
        f((1.0 - neutral) * 0.4), // engaged
        f(surprise * 0.3 + fear * 0.2), // confused
        f(fear * 0.7 + sad * 0.2), // anxious
        f(happy * 0.4 + (1.0 - fear) * 0.2), // confident
        f(surprise * 0.4 + happy * 0.3), // interested
        f(neutral * 0.4), // bored
        f(surprise * 0.6 + (1.0 - neutral) * 0.15), // curious
        f(angry * 0.4 + fear * 0.4), // stressed
    ]
}
