use fitroom::core::gate::{GatePhase, GateState};
use fitroom::{FitError, GateOutcome, MeasurementSample, ResultGate};
use std::time::Duration;
use tokio::time::Instant;

fn sample() -> MeasurementSample {
    MeasurementSample::new(91.0, 44.0, 68.0, 50.0)
}

async fn reveal_time(
    remote_ms: u64,
    sim_ms: u64,
    result: Result<MeasurementSample, FitError>,
) -> (Duration, GateOutcome<MeasurementSample>) {
    let begin = Instant::now();
    let handle = ResultGate::start_with_duration(
        async move {
            tokio::time::sleep(Duration::from_millis(remote_ms)).await;
            result
        },
        Duration::from_millis(sim_ms),
        Duration::from_millis(50),
    );
    let outcome = handle.outcome().await.unwrap();
    (begin.elapsed(), outcome)
}

#[tokio::test(start_paused = true)]
async fn test_reveal_time_is_the_later_of_both_paths() {
    let cases = [(200, 4000), (4000, 200), (1500, 1500), (0, 3000), (3000, 0)];

    for (remote_ms, sim_ms) in cases {
        let (elapsed, outcome) = reveal_time(remote_ms, sim_ms, Ok(sample())).await;
        let expected = Duration::from_millis(remote_ms.max(sim_ms));

        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "remote {}ms / sim {}ms revealed at {:?}",
            remote_ms,
            sim_ms,
            elapsed
        );
        match outcome {
            GateOutcome::Success(s) => assert_eq!(s, sample()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_rejection_is_never_revealed_early() {
    let (elapsed, outcome) = reveal_time(
        100,
        3500,
        Err(FitError::conversion("failed to prepare image")),
    )
    .await;

    assert!(elapsed >= Duration::from_millis(3500));
    assert!(matches!(
        outcome,
        GateOutcome::Failure(FitError::ConversionError { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_gate() {
    let handle = ResultGate::start_with_duration(
        async {
            tokio::time::sleep(Duration::from_millis(10_000)).await;
            Ok(sample())
        },
        Duration::from_millis(500),
        Duration::from_millis(50),
    );
    let mut progress = handle.progress();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let before = *progress.borrow_and_update();
    drop(handle);

    // The driver exits and closes the progress channel without further ticks.
    assert!(progress.changed().await.is_err());
    assert_eq!(*progress.borrow(), before);
    assert!(before.percent < 100);
    assert_ne!(before.phase, GatePhase::Complete);
}

#[test]
fn test_state_machine_single_emission_for_every_settle_sequence() {
    // Each sequence may repeat settle calls; exactly one must yield an outcome.
    let sequences: [&[char]; 6] = [
        &['r', 's'],
        &['s', 'r'],
        &['r', 'r', 's', 's'],
        &['s', 's', 'r', 'r'],
        &['r', 's', 'r', 's'],
        &['s', 'r', 's', 'r'],
    ];

    for sequence in sequences {
        let mut state = GateState::new();
        let mut emitted = Vec::new();

        for (i, event) in sequence.iter().enumerate() {
            let result = match event {
                'r' => state.settle_remote(Ok(sample())),
                _ => state.settle_sim(),
            };
            if let Some(outcome) = result {
                emitted.push((i, outcome));
            }
            assert!(state.try_complete().is_none());
        }

        assert_eq!(emitted.len(), 1, "sequence {:?}", sequence);
        assert!(matches!(&emitted[0].1, GateOutcome::Success(s) if *s == sample()));
        assert_eq!(state.phase(), GatePhase::Complete);
    }
}
