// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Fixed-interval tick driver.
//!
//! Runs on its own thread: every interval it reads the latest snapshot from
//! each source, ticks the session and sends the frame downstream. Readings
//! are consumed as-is; video and audio timestamps are not reconciled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::config::DriverConfig;
use crate::session::{FusedFrame, FusionSession};
use crate::sources::EmotionSource;

/// Handle to a running driver thread.
pub struct FusionDriver {
    session: Arc<FusionSession>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl FusionDriver {
    /// Spawn the driver. The session must already be started.
    pub fn spawn(
        session: Arc<FusionSession>,
        video: Arc<dyn EmotionSource>,
        audio: Arc<dyn EmotionSource>,
        config: &DriverConfig,
        frames: Sender<FusedFrame>,
    ) -> Result<Self> {
        if config.interval_ms == 0 {
            bail!("driver.interval_ms must be > 0");
        }
        let interval = Duration::from_millis(config.interval_ms);
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let session = session.clone();
            let running = running.clone();
            thread::Builder::new()
                .name("fusion-driver".into())
                .spawn(move || {
                    run_loop(
                        &session,
                        video.as_ref(),
                        audio.as_ref(),
                        interval,
                        &running,
                        &frames,
                    )
                })
                .context("spawning fusion driver thread")?
        };

        info!(interval_ms = config.interval_ms, "Emotion update driver started");
        Ok(Self {
            session,
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop scheduling ticks, wait for the thread, then stop the session.
    /// Returns the number of frames emitted.
    pub fn stop(mut self) -> Result<u64> {
        let emitted = self.halt()?;
        self.session.stop()?;
        Ok(emitted)
    }

    fn halt(&mut self) -> Result<u64> {
        self.running.store(false, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("fusion driver thread panicked")),
            None => Ok(0),
        }
    }
}

/// Dropping a driver that was never stopped halts the thread and stops the
/// session, same as `stop()` but with errors logged instead of returned.
impl Drop for FusionDriver {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        if let Err(e) = self.halt() {
            warn!("fusion driver halt on drop: {e:#}");
        }
        if self.session.is_active() {
            if let Err(e) = self.session.stop() {
                warn!("fusion session stop on drop: {e:#}");
            }
        }
    }
}

fn run_loop(
    session: &FusionSession,
    video: &dyn EmotionSource,
    audio: &dyn EmotionSource,
    interval: Duration,
    running: &AtomicBool,
    frames: &Sender<FusedFrame>,
) -> u64 {
    let mut emitted = 0u64;
    while running.load(Ordering::Acquire) {
        let started = Instant::now();

        let frame = session.tick(&video.emotions(), &audio.emotions());
        if frames.send(frame).is_err() {
            debug!("frame receiver dropped; driver exiting");
            running.store(false, Ordering::Release);
            break;
        }
        emitted += 1;

        // Sleep in short slices so a stop request is honored promptly
        let deadline = started + interval;
        while running.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(Duration::from_millis(10)));
        }
    }
    info!(frames = emitted, "Emotion update driver stopped");
    emitted
}
