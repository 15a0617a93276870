// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! FusionEngine — per-session orchestrator of the fusion pipeline.
//!
//! Each tick runs:
//! 1. Base normalization + mode selection (audio active / fallback)
//! 2. Composite derivation from the normalized base signals
//! 3. Asymmetric temporal smoothing against the previous output
//! 4. Anti-stagnation jitter, clipping and the final cap
//!
//! The previous output is the only state carried between ticks. It is
//! replaced wholesale at the end of a completed tick.

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, bail, Result};
use tracing::{error, info};

use crate::bounding::{finalize, jitter_for, JitterSource};
use crate::composite::derive_composites;
use crate::config::FusionConfig;
use crate::normalizer::{normalize, FusionMode};
use crate::registry::Emotion;
use crate::stabilizer::smooth;
use crate::vector::{EmotionVector, RawVector};

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FusionOutcome {
    pub emotions: EmotionVector,
    pub mode: FusionMode,
}

/// The emotion fusion engine.
pub struct FusionEngine {
    config: FusionConfig,
    jitter: Box<dyn JitterSource>,
    previous: EmotionVector,
}

impl FusionEngine {
    /// Create an engine, drawing jitter as the config specifies.
    pub fn new(config: FusionConfig) -> Result<Self> {
        let jitter = jitter_for(&config);
        Self::with_jitter(config, jitter)
    }

    /// Create an engine with an explicit jitter source.
    pub fn with_jitter(config: FusionConfig, jitter: Box<dyn JitterSource>) -> Result<Self> {
        let issues = config.validate();
        if !issues.is_empty() {
            bail!("invalid fusion config: {}", issues.join("; "));
        }
        Ok(Self {
            config,
            jitter,
            previous: EmotionVector::zeros(),
        })
    }

    /// Run one tick and report the mode used.
    pub fn step(&mut self, video: &RawVector, audio: &RawVector) -> FusionOutcome {
        let cfg = &self.config;

        // 1. Base signals
        let (base, mode) = normalize(video, audio, cfg);

        // 2. Composites
        let composites = derive_composites(&base, cfg);

        // 3. Merge into the canonical layout
        let mut merged = EmotionVector::zeros();
        for (i, e) in Emotion::VISUAL.iter().enumerate() {
            merged.set(*e, base.visual[i]);
        }
        for (i, e) in Emotion::VOCAL.iter().enumerate() {
            merged.set(*e, base.vocal[i]);
        }
        for (i, e) in Emotion::COMPOSITE.iter().enumerate() {
            merged.set(*e, composites[i]);
        }
        let merged = merged.sanitized();

        // 4. Temporal smoothing, 5. jitter + bounds
        let smoothed = smooth(&merged, &self.previous, cfg);
        let emotions = finalize(&smoothed, self.jitter.as_mut(), cfg).sanitized();

        // 6. Commit
        self.previous = emotions;
        FusionOutcome { emotions, mode }
    }

    /// Run one tick and return the fused vector.
    pub fn fuse(&mut self, video: &RawVector, audio: &RawVector) -> EmotionVector {
        self.step(video, audio).emotions
    }

    /// Run one tick, converting any internal fault into an error.
    /// The previous output is left untouched on failure.
    pub fn try_step(&mut self, video: &RawVector, audio: &RawVector) -> Result<FusionOutcome> {
        panic::catch_unwind(AssertUnwindSafe(|| self.step(video, audio))).map_err(|payload| {
            anyhow!("fusion tick panicked: {}", panic_message(payload.as_ref()))
        })
    }

    /// Fault-tolerant tick: on an internal fault, logs it and returns the
    /// last good output (all-zero before the first tick).
    pub fn get_all(&mut self, video: &RawVector, audio: &RawVector) -> EmotionVector {
        match self.try_step(video, audio) {
            Ok(outcome) => outcome.emotions,
            Err(e) => {
                error!("Error in emotion fusion: {e:#}");
                self.previous
            }
        }
    }

    /// Forget all temporal momentum.
    pub fn reset(&mut self) {
        self.previous = EmotionVector::zeros();
        info!("Emotion fusion state reset");
    }

    /// Last committed output.
    pub fn previous(&self) -> &EmotionVector {
        &self.previous
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
