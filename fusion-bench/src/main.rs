//! Emotion Fusion Benchmarks and Validation
//!
//! Measures:
//! 1. Fusion tick latency (jitter on / off)
//! 2. Fallback synthesis and composite derivation cost
//! 3. Validation: range, caps, decay, mode switch
//! 4. A short live session through the tick driver

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use fusion_core::composite::derive_composites;
use fusion_core::normalizer::{normalize, synthesize_vocal};
use fusion_core::sources::{map_speech_labels, percentages_to_unit};
use fusion_core::{
    summarize, DriverConfig, Emotion, EmotionVector, FusionConfig, FusionDriver, FusionEngine,
    FusionMode, FusionSession, RawVector, SnapshotSource,
};

const VIDEO_LABELS: [&str; 7] = ["happy", "sad", "angry", "fear", "surprise", "disgust", "neutral"];
const SPEECH_LABELS: [&str; 7] = ["ang", "hap", "neu", "sad", "calm", "excited", "fearful"];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Emotion Fusion Benchmarks ===\n");

    bench_fuse(FusionConfig::default(), "jitter");
    bench_fuse(FusionConfig::deterministic(42), "deterministic");
    bench_fallback_synthesis();
    bench_composites();

    println!("=== Validation ===\n");
    validate_range()?;
    validate_caps()?;
    validate_decay()?;
    validate_mode_switch()?;

    println!("=== Live Session ===\n");
    live_session()?;

    println!("=== All benchmarks complete ===");
    Ok(())
}

// ─── Inputs ──────────────────────────────────────

fn random_face(rng: &mut StdRng) -> RawVector {
    VIDEO_LABELS
        .iter()
        .map(|l| (l.to_string(), rng.gen_range(0.0..1.0)))
        .collect()
}

fn random_speech(rng: &mut StdRng) -> RawVector {
    // A third of the readings are silent
    if rng.gen_bool(0.33) {
        return RawVector::new();
    }
    let raw: RawVector = SPEECH_LABELS
        .iter()
        .map(|l| (l.to_string(), rng.gen_range(0.0..1.0)))
        .collect();
    map_speech_labels(&raw)
}

// ─── Benchmarks ──────────────────────────────────

fn bench_fuse(config: FusionConfig, label: &str) {
    let mut rng = StdRng::seed_from_u64(42);
    let inputs: Vec<(RawVector, RawVector)> = (0..1000)
        .map(|_| (random_face(&mut rng), random_speech(&mut rng)))
        .collect();

    let mut engine = match FusionEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            println!("[{label}] Skipped — {e:#}\n");
            return;
        }
    };

    // Warmup
    for (video, audio) in inputs.iter().take(100) {
        engine.fuse(video, audio);
    }

    let ticks = 100_000u64;
    let start = Instant::now();
    for i in 0..ticks as usize {
        let (video, audio) = &inputs[i % inputs.len()];
        engine.fuse(video, audio);
    }
    let elapsed = start.elapsed();

    let per_tick_ns = elapsed.as_nanos() as f64 / ticks as f64;
    println!(
        "[{label}] fuse: {ticks} ticks in {:.2}ms ({:.0}ns/tick)",
        elapsed.as_secs_f64() * 1000.0,
        per_tick_ns,
    );
}

fn bench_fallback_synthesis() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = FusionConfig::default();
    let face = random_face(&mut rng);

    let iters = 100_000u64;
    let start = Instant::now();
    let mut acc = 0.0f32;
    for _ in 0..iters {
        acc += synthesize_vocal(&face, &config)[0];
    }
    let elapsed = start.elapsed();

    println!(
        "[CPU] fallback synthesis: {iters} evals in {:.2}ms ({:.0}ns/eval, checksum {acc:.1})",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_nanos() as f64 / iters as f64,
    );
}

fn bench_composites() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = FusionConfig::default();
    let (base, _) = normalize(&random_face(&mut rng), &random_speech(&mut rng), &config);

    let iters = 100_000u64;
    let start = Instant::now();
    let mut acc = 0.0f32;
    for _ in 0..iters {
        acc += derive_composites(&base, &config)[0];
    }
    let elapsed = start.elapsed();

    println!(
        "[CPU] composites: {iters} evals in {:.2}ms ({:.0}ns/eval, checksum {acc:.1})\n",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_nanos() as f64 / iters as f64,
    );
}

// ─── Validation ──────────────────────────────────

fn max_and_min(v: &EmotionVector) -> (f32, f32) {
    v.iter().fold((f32::MIN, f32::MAX), |(hi, lo), (_, s)| (hi.max(s), lo.min(s)))
}

fn validate_range() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut engine = FusionEngine::new(FusionConfig::default())?;

    let mut hi = 0.0f32;
    let mut lo = 1.0f32;
    for _ in 0..10_000 {
        let out = engine.get_all(&random_face(&mut rng), &random_speech(&mut rng));
        let (h, l) = max_and_min(&out);
        hi = hi.max(h);
        lo = lo.min(l);
    }

    println!("  range: 10000 random ticks, min={lo:.4} max={hi:.4}");
    if lo < 0.0 || hi > 0.92 {
        bail!("range violated: [{lo}, {hi}]");
    }
    Ok(())
}

fn validate_caps() -> Result<()> {
    let mut config = FusionConfig::default();
    config.sensitivity_boost = 5.0;
    let mut engine = FusionEngine::new(config)?;

    let saturated: RawVector = VIDEO_LABELS.iter().map(|l| (l.to_string(), 1.0)).collect();
    let loud: RawVector = SPEECH_LABELS.iter().map(|l| (l.to_string(), 1.0)).collect();
    let mut hi = 0.0f32;
    for i in 0..1000 {
        let audio = if i % 2 == 0 {
            RawVector::new()
        } else {
            map_speech_labels(&loud)
        };
        hi = hi.max(max_and_min(&engine.fuse(&saturated, &audio)).0);
    }

    println!("  caps: boost 5.0 saturated input, max={hi:.4}");
    if hi > 0.92 {
        bail!("final cap violated: {hi}");
    }
    Ok(())
}

fn validate_decay() -> Result<()> {
    let mut engine = FusionEngine::new(FusionConfig::deterministic(1))?;
    let face: RawVector = [("happy".to_string(), 0.9)].into_iter().collect();
    for _ in 0..30 {
        engine.fuse(&face, &RawVector::new());
    }

    let mut prev = engine.previous().get(Emotion::Happy);
    let start = prev;
    let mut ticks = 0;
    while prev > 0.01 {
        let now = engine.fuse(&RawVector::new(), &RawVector::new()).get(Emotion::Happy);
        if now > prev {
            bail!("decay not monotonic at tick {ticks}: {prev} -> {now}");
        }
        prev = now;
        ticks += 1;
    }

    println!("  decay: happy {start:.3} -> {prev:.4} in {ticks} ticks");
    Ok(())
}

fn validate_mode_switch() -> Result<()> {
    let mut engine = FusionEngine::new(FusionConfig::deterministic(1))?;
    let face: RawVector = [("angry".to_string(), 0.9)].into_iter().collect();
    let speech: RawVector = [("calm".to_string(), 0.7)].into_iter().collect();
    let speech = map_speech_labels(&speech);

    let before = engine.step(&face, &RawVector::new());
    let after = engine.step(&face, &speech);
    if before.mode != FusionMode::AudioFallback || after.mode != FusionMode::AudioActive {
        bail!("unexpected modes: {:?} -> {:?}", before.mode, after.mode);
    }

    let calm_before = before.emotions.get(Emotion::Calm);
    let calm_after = after.emotions.get(Emotion::Calm);
    println!(
        "  mode switch: {} -> {}, calm {calm_before:.4} -> {calm_after:.4}\n",
        before.mode.name(),
        after.mode.name(),
    );
    Ok(())
}

// ─── Live session ────────────────────────────────

fn live_session() -> Result<()> {
    let mut config = FusionConfig::default();
    config.seed = Some(42);
    let session = Arc::new(FusionSession::new(config));
    session.start()?;

    let video = SnapshotSource::new();
    let audio = SnapshotSource::new();
    let (tx, rx) = mpsc::channel();
    let driver = FusionDriver::spawn(
        session.clone(),
        Arc::new(video.clone()),
        Arc::new(audio.clone()),
        &DriverConfig { interval_ms: 20 },
        tx,
    )?;

    // Producers: a face detector reporting percentages, a speech model that
    // only talks during the second half
    let producer = thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(9);
        for step in 0..40 {
            let face: RawVector = VIDEO_LABELS
                .iter()
                .map(|l| (l.to_string(), rng.gen_range(0.0..100.0)))
                .collect();
            video.publish(percentages_to_unit(&face));
            if step >= 20 {
                audio.publish(random_speech(&mut rng));
            }
            thread::sleep(Duration::from_millis(10));
        }
    });

    let mut frames = Vec::new();
    let deadline = Instant::now() + Duration::from_millis(500);
    while Instant::now() < deadline {
        if let Ok(frame) = rx.recv_timeout(Duration::from_millis(50)) {
            frames.push(frame);
        }
    }
    if producer.join().is_err() {
        bail!("producer thread panicked");
    }

    let emitted = driver.stop()?;
    let fallback = frames
        .iter()
        .filter(|f| f.mode == Some(FusionMode::AudioFallback))
        .count();
    println!(
        "  driver: {emitted} frames emitted, {} received, {fallback} in fallback",
        frames.len()
    );

    if let Some(last) = frames.last() {
        let summary = summarize(&last.emotions);
        println!(
            "  last frame #{}: dominant {}, tone {}",
            last.tick,
            summary.dominant_label(),
            summary.tone.describe(),
        );
        let active: Vec<String> = last
            .emotions
            .labeled()
            .into_iter()
            .filter(|&(_, v)| v > 0.3)
            .map(|(l, v)| format!("{l}={v:.2}"))
            .collect();
        println!("  active: {}", active.join(" "));
        println!("  {}", serde_json::to_string(&last)?);
    }
    println!("  status: {:?}\n", session.status());
    Ok(())
}
