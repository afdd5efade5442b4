//! Reveal gate for remote results.
//!
//! A gate runs a remote task next to a simulated progress bar and releases a
//! single [`GateOutcome`] once *both* have settled. A fast service still shows
//! the full progress animation; a slow one keeps the bar at 100% until it
//! answers. Remote failures are captured and come out as
//! [`GateOutcome::Failure`], never as a panic or an early return.

use crate::domain::model::{MeasurementSample, TryOnImage};
use crate::utils::error::{FitError, Result};
use rand::Rng;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Tells the gate whether a successful remote payload carries anything usable.
pub trait Detection {
    fn is_detected(&self) -> bool;
}

impl Detection for MeasurementSample {
    fn is_detected(&self) -> bool {
        !self.is_empty()
    }
}

impl Detection for TryOnImage {
    fn is_detected(&self) -> bool {
        self.image.as_deref().is_some_and(|image| !image.trim().is_empty())
    }
}

#[derive(Debug)]
pub enum GateOutcome<T> {
    Success(T),
    /// The remote call succeeded but found nothing, e.g. no body in frame.
    Empty,
    Failure(FitError),
}

impl<T> GateOutcome<T> {
    pub fn into_result(self) -> Result<T> {
        match self {
            GateOutcome::Success(payload) => Ok(payload),
            GateOutcome::Empty => Err(FitError::NoDetection),
            GateOutcome::Failure(err) => Err(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GateOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePhase {
    Pending,
    RemoteDone,
    SimDone,
    Complete,
}

/// Two settle flags, the remote payload slot and a completion latch.
#[derive(Debug)]
pub struct GateState<T> {
    remote: Option<Result<T>>,
    remote_settled: bool,
    sim_settled: bool,
    completed: bool,
}

impl<T> Default for GateState<T> {
    fn default() -> Self {
        Self {
            remote: None,
            remote_settled: false,
            sim_settled: false,
            completed: false,
        }
    }
}

impl<T: Detection> GateState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GatePhase {
        match (self.completed, self.remote_settled, self.sim_settled) {
            (true, _, _) => GatePhase::Complete,
            (false, true, false) => GatePhase::RemoteDone,
            (false, false, true) => GatePhase::SimDone,
            // both settled without completing cannot be observed from outside
            _ => GatePhase::Pending,
        }
    }

    pub fn remote_settled(&self) -> bool {
        self.remote_settled
    }

    pub fn sim_settled(&self) -> bool {
        self.sim_settled
    }

    /// Records the remote result. Later calls are ignored.
    pub fn settle_remote(&mut self, result: Result<T>) -> Option<GateOutcome<T>> {
        if self.remote_settled {
            return None;
        }
        self.remote = Some(result);
        self.remote_settled = true;
        self.try_complete()
    }

    pub fn settle_sim(&mut self) -> Option<GateOutcome<T>> {
        if self.sim_settled {
            return None;
        }
        self.sim_settled = true;
        self.try_complete()
    }

    /// Yields the outcome the first time both sides are settled, `None` otherwise.
    pub fn try_complete(&mut self) -> Option<GateOutcome<T>> {
        if self.completed || !(self.remote_settled && self.sim_settled) {
            return None;
        }
        let result = self.remote.take()?;
        self.completed = true;

        Some(match result {
            Ok(payload) if payload.is_detected() => GateOutcome::Success(payload),
            Ok(_) => GateOutcome::Empty,
            Err(err) => GateOutcome::Failure(err),
        })
    }
}

/// Bounds for the simulated processing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationPlan {
    pub min: Duration,
    pub max: Duration,
    pub tick: Duration,
}

impl SimulationPlan {
    pub fn new(min_ms: u64, max_ms: u64, tick_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms.max(min_ms)),
            tick: Duration::from_millis(tick_ms.max(1)),
        }
    }

    pub fn fixed(duration: Duration, tick: Duration) -> Self {
        Self {
            min: duration,
            max: duration,
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    /// Uniform draw from `[min, max]` at millisecond resolution.
    pub fn draw_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        if lo >= hi {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self::new(3000, 5000, 50)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateProgress {
    pub percent: u8,
    pub phase: GatePhase,
}

impl GateProgress {
    fn initial() -> Self {
        Self {
            percent: 0,
            phase: GatePhase::Pending,
        }
    }
}

fn progress_percent(elapsed: Duration, total: Duration) -> u8 {
    if total.is_zero() {
        return 100;
    }
    let ratio = elapsed.as_secs_f64() / total.as_secs_f64();
    (ratio * 100.0).clamp(0.0, 100.0) as u8
}

/// Caller's side of a running gate.
///
/// Dropping the handle disposes the gate: the progress timer stops and a
/// remote result arriving afterwards is thrown away.
#[derive(Debug)]
pub struct GateHandle<T> {
    progress: watch::Receiver<GateProgress>,
    outcome: oneshot::Receiver<GateOutcome<T>>,
    cancel: CancellationToken,
    simulated: Duration,
}

impl<T> GateHandle<T> {
    pub fn progress(&self) -> watch::Receiver<GateProgress> {
        self.progress.clone()
    }

    pub fn simulated_duration(&self) -> Duration {
        self.simulated
    }

    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Waits for the reveal. Resolves to [`FitError::Cancelled`] if the gate
    /// was disposed first.
    pub async fn outcome(mut self) -> Result<GateOutcome<T>> {
        (&mut self.outcome).await.map_err(|_| FitError::Cancelled)
    }
}

impl<T> Drop for GateHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct ResultGate;

impl ResultGate {
    /// Starts the remote task and a progress simulation with a duration drawn from `plan`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<T, F>(remote: F, plan: SimulationPlan) -> GateHandle<T>
    where
        T: Detection + Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let duration = plan.draw_duration(&mut rand::thread_rng());
        Self::start_with_duration(remote, duration, plan.tick)
    }

    pub fn start_with_duration<T, F>(remote: F, duration: Duration, tick: Duration) -> GateHandle<T>
    where
        T: Detection + Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (progress_tx, progress_rx) = watch::channel(GateProgress::initial());
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        tracing::debug!("Gate started, simulated duration {:?}", duration);
        tokio::spawn(drive(
            remote,
            duration,
            tick.max(Duration::from_millis(1)),
            progress_tx,
            outcome_tx,
            cancel.clone(),
        ));

        GateHandle {
            progress: progress_rx,
            outcome: outcome_rx,
            cancel,
            simulated: duration,
        }
    }
}

async fn drive<T, F>(
    remote: F,
    duration: Duration,
    tick: Duration,
    progress: watch::Sender<GateProgress>,
    outcome: oneshot::Sender<GateOutcome<T>>,
    cancel: CancellationToken,
) where
    T: Detection,
    F: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut state = GateState::new();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(remote);
    tokio::pin!(deadline);

    let revealed = loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!("Gate disposed in phase {:?}, dropping pending work", state.phase());
                return;
            }

            result = &mut remote, if !state.remote_settled() => {
                match &result {
                    Ok(_) => tracing::debug!("Remote task settled after {:?}", started.elapsed()),
                    Err(e) => tracing::warn!("Remote task failed after {:?}: {}", started.elapsed(), e),
                }
                if let Some(done) = state.settle_remote(result) {
                    break done;
                }
                progress.send_modify(|p| p.phase = state.phase());
            }

            _ = &mut deadline, if !state.sim_settled() => {
                tracing::debug!("Simulated progress finished after {:?}", started.elapsed());
                if let Some(done) = state.settle_sim() {
                    break done;
                }
                progress.send_replace(GateProgress {
                    percent: 100,
                    phase: state.phase(),
                });
            }

            _ = ticker.tick(), if !state.sim_settled() => {
                let percent = progress_percent(started.elapsed(), duration);
                progress.send_modify(|p| p.percent = percent);
            }
        }
    };

    progress.send_replace(GateProgress {
        percent: 100,
        phase: GatePhase::Complete,
    });
    tracing::info!(
        "Results revealed after {:?} (success: {})",
        started.elapsed(),
        revealed.is_success()
    );
    // A dropped receiver means nobody is waiting any more.
    let _ = outcome.send(revealed);
}
