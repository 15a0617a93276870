// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Canonical emotion registry — the fixed, ordered 28-label vocabulary.
//!
//! 7 base-visual emotions (facial classifier), 11 base-vocal emotions
//! (speech classifier) and 10 composites derived from both. Every fused
//! vector carries exactly these labels, in this order.

use serde::{Deserialize, Serialize};

/// Total number of canonical emotions.
pub const EMOTION_COUNT: usize = 28;
/// Number of base-visual emotions.
pub const VISUAL_COUNT: usize = 7;
/// Number of base-vocal emotions.
pub const VOCAL_COUNT: usize = 11;
/// Number of composite emotions.
pub const COMPOSITE_COUNT: usize = 10;

/// Which modality (or derivation) an emotion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionClass {
    /// Reported by the facial-expression classifier.
    Visual,
    /// Reported by the speech classifier (or synthesized in fallback mode).
    Vocal,
    /// Weighted combination of visual and vocal emotions.
    Composite,
}

/// One canonical emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    // Base-visual
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Disgust,
    Neutral,
    // Base-vocal
    Calm,
    Excited,
    Frustrated,
    Engaged,
    Confused,
    Anxious,
    Confident,
    Interested,
    Bored,
    Curious,
    Stressed,
    // Composite
    Receptiveness,
    Awareness,
    Trust,
    Anticipation,
    Relaxed,
    Skeptical,
    Distracted,
    Enthusiastic,
    Contemplative,
    Alert,
}

impl Emotion {
    /// All 28 labels in canonical order.
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Fear,
        Self::Surprise,
        Self::Disgust,
        Self::Neutral,
        Self::Calm,
        Self::Excited,
        Self::Frustrated,
        Self::Engaged,
        Self::Confused,
        Self::Anxious,
        Self::Confident,
        Self::Interested,
        Self::Bored,
        Self::Curious,
        Self::Stressed,
        Self::Receptiveness,
        Self::Awareness,
        Self::Trust,
        Self::Anticipation,
        Self::Relaxed,
        Self::Skeptical,
        Self::Distracted,
        Self::Enthusiastic,
        Self::Contemplative,
        Self::Alert,
    ];

    pub const VISUAL: [Emotion; VISUAL_COUNT] = [
        Self::Happy,
        Self::Sad,
        Self::Angry,
        Self::Fear,
        Self::Surprise,
        Self::Disgust,
        Self::Neutral,
    ];

    pub const VOCAL: [Emotion; VOCAL_COUNT] = [
        Self::Calm,
        Self::Excited,
        Self::Frustrated,
        Self::Engaged,
        Self::Confused,
        Self::Anxious,
        Self::Confident,
        Self::Interested,
        Self::Bored,
        Self::Curious,
        Self::Stressed,
    ];

    pub const COMPOSITE: [Emotion; COMPOSITE_COUNT] = [
        Self::Receptiveness,
        Self::Awareness,
        Self::Trust,
        Self::Anticipation,
        Self::Relaxed,
        Self::Skeptical,
        Self::Distracted,
        Self::Enthusiastic,
        Self::Contemplative,
        Self::Alert,
    ];

    /// Position in [`Emotion::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn class(self) -> EmotionClass {
        let i = self.index();
        if i < VISUAL_COUNT {
            EmotionClass::Visual
        } else if i < VISUAL_COUNT + VOCAL_COUNT {
            EmotionClass::Vocal
        } else {
            EmotionClass::Composite
        }
    }

    /// Wire label (lowercase), as produced by the classifiers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Disgust => "disgust",
            Self::Neutral => "neutral",
            Self::Calm => "calm",
            Self::Excited => "excited",
            Self::Frustrated => "frustrated",
            Self::Engaged => "engaged",
            Self::Confused => "confused",
            Self::Anxious => "anxious",
            Self::Confident => "confident",
            Self::Interested => "interested",
            Self::Bored => "bored",
            Self::Curious => "curious",
            Self::Stressed => "stressed",
            Self::Receptiveness => "receptiveness",
            Self::Awareness => "awareness",
            Self::Trust => "trust",
            Self::Anticipation => "anticipation",
            Self::Relaxed => "relaxed",
            Self::Skeptical => "skeptical",
            Self::Distracted => "distracted",
            Self::Enthusiastic => "enthusiastic",
            Self::Contemplative => "contemplative",
            Self::Alert => "alert",
        }
    }

    /// Capitalized display name ("Happy", "Receptiveness").
    pub fn display_name(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Look up a label by name, ignoring ASCII case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(trimmed))
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
