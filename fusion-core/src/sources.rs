// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Emotion sources — the boundary to the video and audio classifiers.
//!
//! Acquisition loops run on their own threads and publish their latest
//! reading into a [`SnapshotSource`]; the tick driver reads a copy. The
//! adapters here turn classifier-native outputs into raw vectors the engine
//! understands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::registry::Emotion;
use crate::vector::{finite_or_zero, RawVector};

/// Anything that can report its most recent emotion reading.
pub trait EmotionSource: Send + Sync {
    /// A copy of the latest reading. An empty map means "no signal".
    fn emotions(&self) -> RawVector;
}

/// Lock-guarded latest-value cell shared between a producer thread and the driver.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    latest: Arc<Mutex<RawVector>>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest reading.
    pub fn publish(&self, reading: RawVector) {
        *self.lock() = reading;
    }

    /// Return to the "no signal" state.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, RawVector> {
        self.latest.lock().unwrap_or_else(|poisoned| {
            warn!("emotion snapshot lock poisoned; recovering last reading");
            poisoned.into_inner()
        })
    }
}

impl EmotionSource for SnapshotSource {
    fn emotions(&self) -> RawVector {
        self.lock().clone()
    }
}

/// A source that never reports anything (no camera / no speech model).
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSource;

impl EmotionSource for SilentSource {
    fn emotions(&self) -> RawVector {
        RawVector::new()
    }
}

/// Facial classifiers report percentages; scale every score to [0, 1] units.
pub fn percentages_to_unit(raw: &RawVector) -> RawVector {
    raw.iter()
        .map(|(k, &v)| (k.to_ascii_lowercase(), finite_or_zero(v) / 100.0))
        .collect()
}

/// Canonical form of a speech-classifier label, including the short forms
/// emitted by common speech-emotion heads.
fn speech_label(label: &str) -> Option<&'static str> {
    match label.trim().to_ascii_lowercase().as_str() {
        "angry" | "ang" | "anger" => Some("angry"),
        "calm" => Some("calm"),
        "disgust" => Some("disgust"),
        "fear" | "fearful" => Some("fear"),
        "happy" | "hap" => Some("happy"),
        "neutral" | "neu" => Some("neutral"),
        "sad" => Some("sad"),
        "surprise" | "surprised" => Some("surprise"),
        "excited" => Some("excited"),
        "frustrated" => Some("frustrated"),
        _ => None,
    }
}

/// Map a speech classifier's label distribution onto the 11 base-vocal
/// emotions. The output always carries all 11 keys; an empty input gives
/// all zeros, which the normalizer treats as "no speech signal".
pub fn map_speech_labels(raw: &RawVector) -> RawVector {
    let mut scores: HashMap<&'static str, f32> = HashMap::new();
    for (label, &score) in raw {
        if let Some(canonical) = speech_label(label) {
            scores.insert(canonical, finite_or_zero(score));
        }
    }
    let score = |name: &str| scores.get(name).copied();

    let mut mapped: RawVector = Emotion::VOCAL
        .iter()
        .map(|e| (e.name().to_string(), 0.0))
        .collect();

    for name in ["calm", "excited", "frustrated"] {
        if let Some(v) = score(name) {
            set(&mut mapped, name, v);
        }
    }
    if let Some(angry) = score("angry") {
        raise(&mut mapped, "frustrated", angry * 0.7);
        raise(&mut mapped, "stressed", angry * 0.5);
    }
    if let Some(calm) = score("calm") {
        set(&mut mapped, "confident", calm * 0.6);
    }
    if let Some(happy) = score("happy") {
        set(&mut mapped, "excited", happy * 0.7);
        set(&mut mapped, "engaged", happy * 0.5);
        set(&mut mapped, "interested", happy * 0.6);
    }
    if let Some(neutral) = score("neutral") {
        set(&mut mapped, "bored", neutral * 0.4);
    }
    if let Some(surprise) = score("surprise") {
        set(&mut mapped, "curious", surprise * 0.8);
        raise(&mut mapped, "interested", surprise * 0.6);
    }
    if let Some(fear) = score("fear") {
        set(&mut mapped, "anxious", fear * 0.9);
        set(&mut mapped, "confused", fear * 0.4);
    }

    mapped
}

fn set(mapped: &mut RawVector, name: &str, value: f32) {
    mapped.insert(name.to_string(), value);
}

fn raise(mapped: &mut RawVector, name: &str, value: f32) {
    let slot = mapped.entry(name.to_string()).or_insert(0.0);
    *slot = slot.max(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::has_non_zero;
    use crate::registry::VOCAL_COUNT;
    use crate::vector::{raw_from, read_raw};

    #[test]
    fn test_snapshot_publish_and_read() {
        let source = SnapshotSource::new();
        assert!(source.emotions().is_empty());
        source.publish(raw_from([("happy", 0.4)]));
        let reader = source.clone();
        assert!((read_raw(&reader.emotions(), "happy") - 0.4).abs() < f32::EPSILON);
        source.clear();
        assert!(reader.emotions().is_empty());
    }

    #[test]
    fn test_snapshot_across_threads() {
        let source = SnapshotSource::new();
        let producer = source.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                producer.publish(raw_from([("surprise", i as f32 / 100.0)]));
            }
        });
        handle.join().unwrap();
        assert!((read_raw(&source.emotions(), "surprise") - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_silent_source() {
        assert!(SilentSource.emotions().is_empty());
    }

    #[test]
    fn test_percentages_to_unit() {
        let raw = raw_from([("Happy", 85.0), ("sad", 5.0), ("fear", f32::NAN)]);
        let unit = percentages_to_unit(&raw);
        assert!((read_raw(&unit, "happy") - 0.85).abs() < 1e-6);
        assert!((read_raw(&unit, "sad") - 0.05).abs() < 1e-6);
        assert_eq!(read_raw(&unit, "fear"), 0.0);
    }

    #[test]
    fn test_map_speech_empty_is_no_signal() {
        let mapped = map_speech_labels(&RawVector::new());
        assert_eq!(mapped.len(), VOCAL_COUNT);
        assert!(!has_non_zero(&mapped));
    }

    #[test]
    fn test_map_speech_heuristics() {
        let raw = raw_from([
            ("angry", 0.2),
            ("calm", 0.5),
            ("happy", 0.4),
            ("neutral", 0.5),
            ("surprise", 0.9),
            ("fear", 0.1),
        ]);
        let m = map_speech_labels(&raw);
        assert_eq!(m.len(), VOCAL_COUNT);
        assert!((read_raw(&m, "calm") - 0.5).abs() < 1e-6);
        assert!((read_raw(&m, "confident") - 0.3).abs() < 1e-6);
        assert!((read_raw(&m, "frustrated") - 0.14).abs() < 1e-6);
        assert!((read_raw(&m, "stressed") - 0.1).abs() < 1e-6);
        assert!((read_raw(&m, "excited") - 0.28).abs() < 1e-6);
        assert!((read_raw(&m, "engaged") - 0.2).abs() < 1e-6);
        // max(0.4*0.6, 0.9*0.6)
        assert!((read_raw(&m, "interested") - 0.54).abs() < 1e-6);
        assert!((read_raw(&m, "bored") - 0.2).abs() < 1e-6);
        assert!((read_raw(&m, "curious") - 0.72).abs() < 1e-6);
        assert!((read_raw(&m, "anxious") - 0.09).abs() < 1e-6);
        assert!((read_raw(&m, "confused") - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_map_speech_short_labels() {
        let raw = raw_from([("neu", 0.5), ("hap", 0.2), ("ang", 0.1), ("sad", 0.2)]);
        let m = map_speech_labels(&raw);
        assert!((read_raw(&m, "bored") - 0.2).abs() < 1e-6);
        assert!((read_raw(&m, "excited") - 0.14).abs() < 1e-6);
        assert!((read_raw(&m, "frustrated") - 0.07).abs() < 1e-6);
        assert!(has_non_zero(&m));
    }

    #[test]
    fn test_map_speech_ignores_unknown() {
        let m = map_speech_labels(&raw_from([("laughter", 0.9)]));
        assert!(!has_non_zero(&m));
    }
}
