// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! FusionSession — owns the engine for the lifetime of one tracking session.
//!
//! The engine is built on `start` and reset + dropped on `stop`, so every
//! session begins from a neutral baseline. A single mutex serializes all
//! engine access, which makes the session safe to share between the tick
//! driver and on-demand readers.

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::FusionConfig;
use crate::engine::FusionEngine;
use crate::normalizer::FusionMode;
use crate::registry::EMOTION_COUNT;
use crate::vector::{EmotionVector, RawVector};

/// One emitted update — the payload a transport layer forwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedFrame {
    /// Session tick number (1-based); 0 when no session is active.
    pub tick: u64,
    /// Wall-clock emission time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Mode used for this tick; `None` when inactive or the tick faulted.
    pub mode: Option<FusionMode>,
    pub emotions: EmotionVector,
}

/// Session status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    pub ticks: u64,
    pub fallback_ticks: u64,
    pub emotion_count: usize,
}

struct SessionState {
    engine: Option<FusionEngine>,
    ticks: u64,
    fallback_ticks: u64,
    last_mode: Option<FusionMode>,
}

/// A tracking session.
pub struct FusionSession {
    config: FusionConfig,
    state: Mutex<SessionState>,
}

impl FusionSession {
    /// Create an inactive session. The config is validated on `start`.
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState {
                engine: None,
                ticks: 0,
                fallback_ticks: 0,
                last_mode: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("fusion session lock poisoned; continuing with last committed state");
            poisoned.into_inner()
        })
    }

    /// Start tracking with a fresh engine.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state();
        if state.engine.is_some() {
            bail!("Tracking already active");
        }
        state.engine = Some(FusionEngine::new(self.config.clone())?);
        state.ticks = 0;
        state.fallback_ticks = 0;
        state.last_mode = None;
        info!("Emotion tracking started");
        Ok(())
    }

    /// Stop tracking: reset the engine's momentum and drop it.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state();
        let Some(mut engine) = state.engine.take() else {
            bail!("Tracking not active");
        };
        engine.reset();
        state.last_mode = None;
        info!(ticks = state.ticks, "Emotion tracking stopped");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.state().engine.is_some()
    }

    /// Fuse one pair of readings. Inactive sessions yield an all-zero frame.
    pub fn tick(&self, video: &RawVector, audio: &RawVector) -> FusedFrame {
        let mut state = self.state();
        let timestamp_ms = now_ms();

        let Some(engine) = state.engine.as_mut() else {
            return FusedFrame {
                tick: 0,
                timestamp_ms,
                mode: None,
                emotions: EmotionVector::zeros(),
            };
        };

        let (emotions, mode) = match engine.try_step(video, audio) {
            Ok(outcome) => (outcome.emotions, Some(outcome.mode)),
            Err(e) => {
                error!("Error in emotion fusion: {e:#}");
                (*engine.previous(), None)
            }
        };

        state.ticks += 1;
        if mode == Some(FusionMode::AudioFallback) {
            state.fallback_ticks += 1;
        }
        if let Some(mode) = mode {
            if state.last_mode != Some(mode) {
                debug!(tick = state.ticks, mode = mode.name(), "fusion mode changed");
            }
            state.last_mode = Some(mode);
        }

        FusedFrame {
            tick: state.ticks,
            timestamp_ms,
            mode,
            emotions,
        }
    }

    /// Last committed output, or zeros when inactive. Does not advance the engine.
    pub fn current(&self) -> EmotionVector {
        self.state()
            .engine
            .as_ref()
            .map(|e| *e.previous())
            .unwrap_or_default()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.state();
        SessionStatus {
            active: state.engine.is_some(),
            ticks: state.ticks,
            fallback_ticks: state.fallback_ticks,
            emotion_count: EMOTION_COUNT,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Emotion;
    use crate::vector::raw_from;

    fn session() -> FusionSession {
        FusionSession::new(FusionConfig::deterministic(3))
    }

    fn face() -> RawVector {
        raw_from([("happy", 0.7), ("neutral", 0.2)])
    }

    #[test]
    fn test_inactive_tick_is_zero() {
        let session = session();
        let frame = session.tick(&face(), &RawVector::new());
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.mode, None);
        assert!(frame.emotions.is_zero());
        assert!(!session.is_active());
    }

    #[test]
    fn test_start_twice_fails() {
        let session = session();
        session.start().unwrap();
        let err = session.start().unwrap_err();
        assert!(err.to_string().contains("already active"));
    }

    #[test]
    fn test_stop_inactive_fails() {
        let session = session();
        assert!(session.stop().is_err());
    }

    #[test]
    fn test_start_with_invalid_config_fails() {
        let mut config = FusionConfig::default();
        config.smoothing_alpha = 2.0;
        let session = FusionSession::new(config);
        assert!(session.start().is_err());
        assert!(!session.is_active());
    }

    #[test]
    fn test_ticks_counted() {
        let session = session();
        session.start().unwrap();
        session.tick(&face(), &RawVector::new());
        session.tick(&face(), &raw_from([("calm", 0.6)]));
        let frame = session.tick(&face(), &RawVector::new());
        assert_eq!(frame.tick, 3);
        assert_eq!(frame.mode, Some(FusionMode::AudioFallback));

        let status = session.status();
        assert!(status.active);
        assert_eq!(status.ticks, 3);
        assert_eq!(status.fallback_ticks, 2);
        assert_eq!(status.emotion_count, 28);
    }

    #[test]
    fn test_restart_starts_from_neutral() {
        let session = session();
        session.start().unwrap();
        for _ in 0..20 {
            session.tick(&face(), &RawVector::new());
        }
        assert!(session.current().get(Emotion::Happy) > 0.5);
        session.stop().unwrap();
        assert!(session.current().is_zero());

        session.start().unwrap();
        let frame = session.tick(&face(), &RawVector::new());
        assert_eq!(frame.tick, 1);
        // First tick after restart: alpha * min(1, 0.7 * 1.3)
        assert!((frame.emotions.get(Emotion::Happy) - 0.3 * 0.91).abs() < 1e-5);
    }

    #[test]
    fn test_frame_serializes() {
        let session = session();
        session.start().unwrap();
        let frame = session.tick(&face(), &RawVector::new());
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["mode"], "audio_fallback");
        assert_eq!(json["emotions"].as_object().unwrap().len(), 28);
    }

    #[test]
    fn test_shared_across_threads() {
        let session = std::sync::Arc::new(session());
        session.start().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = session.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        s.tick(&face(), &RawVector::new());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(session.status().ticks, 100);
    }
}
