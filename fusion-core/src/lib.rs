// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

pub mod registry;
pub mod vector;
pub mod config;
pub mod normalizer;
pub mod composite;
pub mod stabilizer;
pub mod bounding;
pub mod engine;
pub mod sources;
pub mod profile;
pub mod session;
pub mod driver;

pub use config::{DriverConfig, FusionConfig, JitterConfig, SaturationCaps, TrackerConfig};
pub use driver::FusionDriver;
pub use engine::{FusionEngine, FusionOutcome};
pub use normalizer::FusionMode;
pub use profile::{summarize, ProfileSummary, ResponseTone};
pub use registry::{Emotion, EmotionClass, EMOTION_COUNT};
pub use session::{FusedFrame, FusionSession, SessionStatus};
pub use sources::{EmotionSource, SilentSource, SnapshotSource};
pub use vector::{EmotionVector, RawVector};
