// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Configuration for the emotion fusion engine and its tick driver.
//!
//! `FusionConfig` is immutable once an engine is built. Every field carries a
//! serde default, so a JSON document only needs to name the fields it overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Anti-stagnation jitter parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Half-width of the uniform perturbation added to active emotions.
    /// 0.0 disables jitter entirely.
    pub amplitude: f32,
    /// Only emotions strictly above this value are perturbed.
    pub activity_threshold: f32,
    /// Upper clip applied right after perturbation.
    pub ceiling: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.01,
            activity_threshold: 0.05,
            ceiling: 0.95,
        }
    }
}

impl JitterConfig {
    pub fn disabled() -> Self {
        Self {
            amplitude: 0.0,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.amplitude > 0.0
    }
}

/// Saturation ceilings applied at different stages of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationCaps {
    /// Ceiling on vocal emotions synthesized from video in fallback mode.
    pub fallback: f32,
    /// Ceiling on every composite emotion.
    pub composite: f32,
    /// Hard ceiling on every emotion in the returned vector.
    pub final_cap: f32,
}

impl Default for SaturationCaps {
    fn default() -> Self {
        Self {
            fallback: 0.85,
            composite: 0.88,
            final_cap: 0.92,
        }
    }
}

/// Fusion engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Legacy blend weight for the visual modality [0, 1].
    pub video_weight: f32,
    /// Weight applied to real vocal scores when audio is active [0, 1].
    pub audio_weight: f32,
    /// Rise speed of the temporal filter (0, 1].
    pub smoothing_alpha: f32,
    /// Per-tick retention fraction for falling emotions (0, 1].
    pub decay_rate: f32,
    /// Gain applied to raw scores before derivation, >= 1.0.
    pub sensitivity_boost: f32,
    pub jitter: JitterConfig,
    pub caps: SaturationCaps,
    /// Seed for the jitter generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            video_weight: 0.5,
            audio_weight: 0.5,
            smoothing_alpha: 0.3,
            decay_rate: 0.85,
            sensitivity_boost: 1.3,
            jitter: JitterConfig::default(),
            caps: SaturationCaps::default(),
            seed: None,
        }
    }
}

impl FusionConfig {
    /// Fast adoption, quick release — follows expression changes closely.
    pub fn responsive() -> Self {
        Self {
            smoothing_alpha: 0.6,
            decay_rate: 0.7,
            ..Self::default()
        }
    }

    /// Slow adoption, long tails — calm dashboard, fewer tone flips downstream.
    pub fn steady() -> Self {
        Self {
            smoothing_alpha: 0.15,
            decay_rate: 0.93,
            ..Self::default()
        }
    }

    /// Jitter disabled and generator seeded: identical inputs give identical outputs.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            jitter: JitterConfig::disabled(),
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid fusion config JSON")
    }

    /// Validate the configuration, returning any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value) in [
            ("video_weight", self.video_weight),
            ("audio_weight", self.audio_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(format!("{name} {value} out of range [0, 1]"));
            }
        }

        for (name, value) in [
            ("smoothing_alpha", self.smoothing_alpha),
            ("decay_rate", self.decay_rate),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                issues.push(format!("{name} {value} out of range (0, 1]"));
            }
        }

        if !(self.sensitivity_boost.is_finite() && self.sensitivity_boost >= 1.0) {
            issues.push(format!(
                "sensitivity_boost {} must be finite and >= 1.0",
                self.sensitivity_boost
            ));
        }

        if !(0.0..=0.1).contains(&self.jitter.amplitude) {
            issues.push(format!(
                "jitter.amplitude {} out of range [0, 0.1]",
                self.jitter.amplitude
            ));
        }
        for (name, value) in [
            ("jitter.activity_threshold", self.jitter.activity_threshold),
            ("jitter.ceiling", self.jitter.ceiling),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(format!("{name} {value} out of range [0, 1]"));
            }
        }

        for (name, value) in [
            ("caps.fallback", self.caps.fallback),
            ("caps.composite", self.caps.composite),
            ("caps.final_cap", self.caps.final_cap),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                issues.push(format!("{name} {value} out of range (0, 1]"));
            }
        }

        issues
    }
}

/// Tick driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Interval between fusion ticks, in milliseconds.
    pub interval_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

/// Full tracker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub fusion: FusionConfig,
    pub driver: DriverConfig,
}

impl TrackerConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading tracker config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing tracker config {}", path.display()))
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.fusion.validate();
        if self.driver.interval_ms == 0 {
            issues.push("driver.interval_ms must be > 0".into());
        }
        issues
    }
}
