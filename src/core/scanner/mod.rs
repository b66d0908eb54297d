// src/core/scanner/mod.rs

// Each simulated scan type lives in its own module; this file drives the shared
// trigger -> latency -> result pipeline.
pub mod checkin_scanner;
pub mod moderation_scanner;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::models::{CheckInMethod, ContentKind, ScanEvent, ScanOutcome};
use crate::core::progress::ScanProgress;
use self::checkin_scanner::generate_check_in;
use self::moderation_scanner::generate_verdict;

/// What the user asked to simulate.
#[derive(Debug, Clone)]
pub enum ScanRequest {
    Moderation { kind: ContentKind, text_len: usize },
    CheckIn { subject_id: String, method: CheckInMethod },
}

/// Runs one simulated scan, reporting progress and then the result over `tx`.
///
/// A total latency is drawn from the configured range and split into ticks of
/// `simulation.tick_ms`. Each tick sends a `ScanEvent::Progress` that never goes
/// backwards; the final events are always `Progress(100)` followed by
/// `Completed`. If the receiver is dropped the scan stops quietly.
///
/// # Arguments
///
/// * `request` - The scan to simulate.
/// * `config` - Shared, read-only configuration.
/// * `tx` - Channel back to the UI loop.
pub async fn run_scan(request: ScanRequest, config: Arc<Config>, tx: mpsc::Sender<ScanEvent>) {
    let mut rng = StdRng::from_entropy();
    let sim = &config.simulation;

    let total_ms = if sim.min_latency_ms >= sim.max_latency_ms {
        sim.min_latency_ms
    } else {
        rng.gen_range(sim.min_latency_ms..=sim.max_latency_ms)
    };
    let tick_ms = sim.tick_ms.max(1);
    let ticks = (total_ms / tick_ms).max(1);
    info!(?request, total_ms, ticks, "Simulated scan started.");

    let mut progress = ScanProgress::new();
    let period = Duration::from_millis(tick_ms);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    for tick in 1..=ticks {
        interval.tick().await;
        // Hold back at 99 until the result is ready.
        let target = ((tick * 100 / ticks) as u8).saturating_sub(rng.gen_range(0..=3)).min(99);
        let percent = progress.advance_to(target);
        if tx.send(ScanEvent::Progress(percent)).await.is_err() {
            debug!("Scan receiver dropped, stopping simulation.");
            return;
        }
    }

    let outcome = produce_outcome(&request, &config, &mut rng);
    let percent = progress.complete();
    if tx.send(ScanEvent::Progress(percent)).await.is_err()
        || tx.send(ScanEvent::Completed(outcome)).await.is_err()
    {
        debug!("Scan receiver dropped before the result was delivered.");
        return;
    }
    info!("Simulated scan delivered.");
}

/// Generates the synthetic result for a request.
pub fn produce_outcome<R: Rng + ?Sized>(request: &ScanRequest, config: &Config, rng: &mut R) -> ScanOutcome {
    match request {
        ScanRequest::Moderation { kind, text_len } => {
            debug!(text_len, "Content submitted; it is not inspected.");
            ScanOutcome::Moderation(generate_verdict(rng, *kind, &config.moderation))
        }
        ScanRequest::CheckIn { subject_id, method } => ScanOutcome::CheckIn(generate_check_in(
            rng,
            subject_id,
            *method,
            &config.checkin,
            Utc::now(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    fn fast_config() -> Arc<Config> {
        let mut config = Config::default();
        config.simulation = SimulationConfig { min_latency_ms: 5, max_latency_ms: 20, tick_ms: 1 };
        Arc::new(config)
    }

    async fn collect(request: ScanRequest) -> Vec<ScanEvent> {
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(run_scan(request, fast_config(), tx));
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_completes_before_result() {
        let events = collect(ScanRequest::Moderation { kind: ContentKind::Text, text_len: 12 }).await;

        let (last, rest) = events.split_last().unwrap();
        assert!(matches!(last, ScanEvent::Completed(ScanOutcome::Moderation(_))));

        let percents: Vec<u8> = rest
            .iter()
            .map(|e| match e {
                ScanEvent::Progress(p) => *p,
                ScanEvent::Completed(_) => panic!("result delivered twice"),
            })
            .collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
        assert_eq!(percents.last(), Some(&100));
        assert!(percents[..percents.len() - 1].iter().all(|p| *p < 100));
    }

    #[tokio::test]
    async fn check_in_request_yields_check_in_record() {
        let events = collect(ScanRequest::CheckIn {
            subject_id: "EMP-42".into(),
            method: CheckInMethod::QrCode,
        })
        .await;
        match events.last() {
            Some(ScanEvent::Completed(ScanOutcome::CheckIn(record))) => {
                assert_eq!(record.subject_id, "EMP-42");
                assert!(record.join_code.is_some());
            }
            other => panic!("unexpected final event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn first_progress_waits_one_tick() {
        let mut config = Config::default();
        config.simulation = SimulationConfig { min_latency_ms: 100, max_latency_ms: 100, tick_ms: 25 };
        let (tx, mut rx) = mpsc::channel(8);
        let started = Instant::now();
        tokio::spawn(run_scan(
            ScanRequest::Moderation { kind: ContentKind::Text, text_len: 3 },
            Arc::new(config),
            tx,
        ));

        let first = rx.recv().await;
        assert!(matches!(first, Some(ScanEvent::Progress(_))));
        assert!(started.elapsed() >= Duration::from_millis(25));

        while rx.recv().await.is_some() {}
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn dropped_receiver_stops_scan() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        // Must return rather than hang.
        run_scan(ScanRequest::Moderation { kind: ContentKind::Audio, text_len: 0 }, fast_config(), tx).await;
    }
}
