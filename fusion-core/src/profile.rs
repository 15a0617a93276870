// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Profile summary — what consumers of the fused vector read first.
//!
//! Produces the dominant emotion, the set of strong emotions and a response
//! tone hint for the conversational agent. Does NOT build prompt text.

use serde::Serialize;

use crate::registry::Emotion;
use crate::vector::EmotionVector;

/// Score above which an emotion counts as "high".
pub const HIGH_EMOTION_THRESHOLD: f32 = 0.6;

/// Tone the conversational agent should adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTone {
    Calming,
    Empathetic,
    Enthusiastic,
    SolutionFocused,
    Patient,
    Engaging,
    Detailed,
    Balanced,
}

impl ResponseTone {
    /// Pick a tone from a fused vector. First matching rule wins.
    pub fn select(v: &EmotionVector) -> Self {
        let e = |emotion: Emotion| v.get(emotion);

        if e(Emotion::Anxious) > 0.5 || e(Emotion::Stressed) > 0.5 {
            Self::Calming
        } else if e(Emotion::Sad) > 0.5 {
            Self::Empathetic
        } else if e(Emotion::Happy) > 0.6 || e(Emotion::Excited) > 0.6 {
            Self::Enthusiastic
        } else if e(Emotion::Angry) > 0.5 || e(Emotion::Frustrated) > 0.5 {
            Self::SolutionFocused
        } else if e(Emotion::Confused) > 0.5 {
            Self::Patient
        } else if e(Emotion::Bored) > 0.5 {
            Self::Engaging
        } else if e(Emotion::Engaged) > 0.6 {
            Self::Detailed
        } else {
            Self::Balanced
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Calming => "calming, reassuring",
            Self::Empathetic => "empathetic, supportive",
            Self::Enthusiastic => "enthusiastic, celebratory",
            Self::SolutionFocused => "calm, solution-focused",
            Self::Patient => "clear, patient",
            Self::Engaging => "engaging, stimulating",
            Self::Detailed => "detailed, informative",
            Self::Balanced => "balanced, professional",
        }
    }
}

/// Condensed view of a fused vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    /// Highest-scoring emotion, if any is meaningfully active.
    pub dominant: Option<(Emotion, f32)>,
    /// Emotions above [`HIGH_EMOTION_THRESHOLD`], in registry order.
    pub high: Vec<Emotion>,
    pub tone: ResponseTone,
}

pub fn summarize(v: &EmotionVector) -> ProfileSummary {
    ProfileSummary {
        dominant: v.dominant(),
        high: v.above(HIGH_EMOTION_THRESHOLD),
        tone: ResponseTone::select(v),
    }
}

impl ProfileSummary {
    /// "happy (0.82)", or "neutral (0.00)" when nothing is active.
    pub fn dominant_label(&self) -> String {
        match self.dominant {
            Some((e, v)) => format!("{} ({:.2})", e.name(), v),
            None => "neutral (0.00)".to_string(),
        }
    }
}
