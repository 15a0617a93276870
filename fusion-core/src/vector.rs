// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Emotion vectors — raw caller-provided readings and the canonical fused vector.

use std::collections::HashMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::registry::{Emotion, EMOTION_COUNT};

/// Raw label → score mapping from a classifier. No range invariant is
/// enforced; absent keys read as `0.0`.
pub type RawVector = HashMap<String, f32>;

/// Map a non-finite value to `0.0`.
#[inline]
pub fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Read `label` from a raw vector, defaulting absent or non-finite scores to `0.0`.
pub fn read_raw(raw: &RawVector, label: &str) -> f32 {
    raw.get(label).copied().map(finite_or_zero).unwrap_or(0.0)
}

/// Build a raw vector from `(label, score)` pairs.
pub fn raw_from<'a, I>(pairs: I) -> RawVector
where
    I: IntoIterator<Item = (&'a str, f32)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// A complete canonical vector: one score per registry label.
///
/// Serialized as a label → score map in registry order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionVector {
    scores: [f32; EMOTION_COUNT],
}

impl EmotionVector {
    pub fn zeros() -> Self {
        Self {
            scores: [0.0; EMOTION_COUNT],
        }
    }

    pub fn get(&self, emotion: Emotion) -> f32 {
        self.scores[emotion.index()]
    }

    pub fn set(&mut self, emotion: Emotion, value: f32) {
        self.scores[emotion.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.iter().map(move |&e| (e, self.scores[e.index()]))
    }

    /// Apply `f` to every score.
    pub fn map(&self, mut f: impl FnMut(Emotion, f32) -> f32) -> Self {
        let mut out = *self;
        for e in Emotion::ALL {
            out.scores[e.index()] = f(e, self.scores[e.index()]);
        }
        out
    }

    /// Replace every non-finite score with `0.0`.
    pub fn sanitized(&self) -> Self {
        self.map(|_, v| finite_or_zero(v))
    }

    pub fn is_zero(&self) -> bool {
        self.scores.iter().all(|&v| v == 0.0)
    }

    /// Highest-scoring emotion; ties go to the earlier registry label.
    /// `None` when every score is below 0.05.
    pub fn dominant(&self) -> Option<(Emotion, f32)> {
        let mut best: Option<(Emotion, f32)> = None;
        for (e, v) in self.iter() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((e, v)),
            }
        }
        best.filter(|&(_, v)| v >= 0.05)
    }

    /// Emotions strictly above `threshold`, in registry order.
    pub fn above(&self, threshold: f32) -> Vec<Emotion> {
        self.iter()
            .filter(|&(_, v)| v > threshold)
            .map(|(e, _)| e)
            .collect()
    }

    /// Build from a string-keyed map, ignoring unknown labels and
    /// defaulting missing ones to `0.0`.
    pub fn from_map<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a f32)>,
    {
        let mut out = Self::zeros();
        for (k, &v) in entries {
            if let Some(e) = Emotion::from_name(k) {
                out.set(e, finite_or_zero(v));
            }
        }
        out
    }

    /// `(wire label, score)` pairs in registry order.
    pub fn labeled(&self) -> Vec<(&'static str, f32)> {
        self.iter().map(|(e, v)| (e.name(), v)).collect()
    }
}

impl Default for EmotionVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Serialize for EmotionVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (e, v) in self.iter() {
            map.serialize_entry(e.name(), &v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, f32> = HashMap::deserialize(deserializer)?;
        Ok(Self::from_map(raw.iter()))
    }
}

/// One `- Label: 0.00` line per canonical emotion.
impl fmt::Display for EmotionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (e, v)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}: {:.2}", e.display_name(), v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_raw_defaults() {
        let raw = raw_from([("happy", 0.4), ("sad", f32::NAN), ("fear", f32::INFINITY)]);
        assert!((read_raw(&raw, "happy") - 0.4).abs() < f32::EPSILON);
        assert_eq!(read_raw(&raw, "sad"), 0.0);
        assert_eq!(read_raw(&raw, "fear"), 0.0);
        assert_eq!(read_raw(&raw, "angry"), 0.0);
    }

    #[test]
    fn test_zeros_complete() {
        let v = EmotionVector::zeros();
        assert_eq!(v.iter().count(), EMOTION_COUNT);
        assert!(v.is_zero());
        assert_eq!(v.dominant(), None);
    }

    #[test]
    fn test_dominant_tie_prefers_registry_order() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Calm, 0.6);
        v.set(Emotion::Happy, 0.6);
        v.set(Emotion::Alert, 0.3);
        assert_eq!(v.dominant(), Some((Emotion::Happy, 0.6)));
    }

    #[test]
    fn test_above_threshold() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Bored, 0.61);
        v.set(Emotion::Sad, 0.7);
        v.set(Emotion::Trust, 0.6);
        assert_eq!(v.above(0.6), vec![Emotion::Sad, Emotion::Bored]);
    }

    #[test]
    fn test_sanitized() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Happy, f32::NAN);
        v.set(Emotion::Sad, f32::NEG_INFINITY);
        v.set(Emotion::Fear, 0.2);
        let s = v.sanitized();
        assert_eq!(s.get(Emotion::Happy), 0.0);
        assert_eq!(s.get(Emotion::Sad), 0.0);
        assert!((s.get(Emotion::Fear) - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_serialize_all_labels() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Curious, 0.5);
        let json = serde_json::to_value(v).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), EMOTION_COUNT);
        assert!((obj["curious"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize_ignores_unknown_labels() {
        let v: EmotionVector =
            serde_json::from_str(r#"{"happy": 0.3, "joy": 0.9, "Alert": 0.2}"#).unwrap();
        assert!((v.get(Emotion::Happy) - 0.3).abs() < 1e-6);
        assert!((v.get(Emotion::Alert) - 0.2).abs() < 1e-6);
        assert_eq!(v.get(Emotion::Sad), 0.0);
    }

    #[test]
    fn test_labeled_in_registry_order() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Alert, 0.4);
        let labeled = v.labeled();
        assert_eq!(labeled.len(), EMOTION_COUNT);
        let head: Vec<&str> = labeled.iter().take(4).map(|&(l, _)| l).collect();
        assert_eq!(head, ["happy", "sad", "angry", "fear"]);
        assert_eq!(labeled[27], ("alert", 0.4));
    }

    #[test]
    fn test_display_lines() {
        let mut v = EmotionVector::zeros();
        v.set(Emotion::Happy, 0.426);
        let text = v.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), EMOTION_COUNT);
        assert_eq!(lines[0], "- Happy: 0.43");
        assert_eq!(lines[27], "- Alert: 0.00");
    }
}
