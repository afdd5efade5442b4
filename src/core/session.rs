use crate::core::gate::{GateHandle, GateOutcome, ResultGate, SimulationPlan};
use crate::core::presentation::PresentationSink;
use crate::core::report::SizeReport;
use crate::core::selection::SelectionStore;
use crate::domain::model::{ImageSource, MeasurementSample, TryOnImage, Unit};
use crate::domain::ports::{ConfigProvider, ImageCodec, MeasurementService};
use crate::utils::error::{FitError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Ties the codec, the measurement service and the reveal gate together for
/// the two user actions: measuring a person and trying a garment on.
pub struct FittingSession<M, I> {
    service: Arc<M>,
    codec: Arc<I>,
    plan: SimulationPlan,
    unit: Unit,
}

impl<M, I> FittingSession<M, I>
where
    M: MeasurementService + 'static,
    I: ImageCodec + 'static,
{
    pub fn new(service: M, codec: I, plan: SimulationPlan, unit: Unit) -> Self {
        Self {
            service: Arc::new(service),
            codec: Arc::new(codec),
            plan,
            unit,
        }
    }

    /// Takes the simulation window and the service unit from `config`.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C, service: M, codec: I) -> Self {
        let plan = SimulationPlan::new(
            config.simulation_min_ms(),
            config.simulation_max_ms(),
            config.tick_ms(),
        );
        Self::new(service, codec, plan, config.measurement_unit())
    }

    pub fn plan(&self) -> SimulationPlan {
        self.plan
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn codec(&self) -> &I {
        &self.codec
    }

    /// Starts a measurement request behind a fresh gate. Image preparation
    /// runs inside the gated task, so a conversion failure is revealed like
    /// any other failure.
    pub fn measure(&self, person: ImageSource) -> GateHandle<MeasurementSample> {
        let service = Arc::clone(&self.service);
        let codec = Arc::clone(&self.codec);

        ResultGate::start(
            async move {
                let encoded = codec.encode(&person).await?;
                tracing::debug!("Person image encoded ({} chars)", encoded.len());
                service.measure(&encoded).await
            },
            self.plan,
        )
    }

    /// Starts a try-on request for the garment currently in `selection`.
    pub fn try_on(
        &self,
        person: ImageSource,
        selection: &SelectionStore,
    ) -> Result<GateHandle<TryOnImage>> {
        let snapshot = selection.snapshot();
        let garment = snapshot.garment.ok_or_else(|| FitError::MissingConfigError {
            field: "garment".to_string(),
        })?;
        let region = snapshot.region;
        tracing::info!("Submitting try-on for a {} garment", region.as_str());

        let service = Arc::clone(&self.service);
        let codec = Arc::clone(&self.codec);

        Ok(ResultGate::start(
            async move {
                let person_b64 = codec.encode(&person).await?;
                let garment_b64 = codec.encode(&garment).await?;
                service.try_on(&person_b64, &garment_b64, region).await
            },
            self.plan,
        ))
    }

    /// Sends a calibration factor without waiting on the caller's behalf.
    /// Failures are only logged.
    pub fn update_conversion(&self, key: impl Into<String>, value: f64) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let key = key.into();
        tokio::spawn(async move {
            match service.update_conversion(&key, value).await {
                Ok(()) => tracing::info!("Conversion factor {} set to {}", key, value),
                Err(e) => tracing::warn!("Conversion factor {} update failed: {}", key, e),
            }
        })
    }

    pub fn report(&self, sample: MeasurementSample) -> SizeReport {
        SizeReport::from_sample(sample, self.unit)
    }

    /// Forwards progress to `sink` until the gate reveals, then presents the outcome.
    pub async fn reveal_measurements<S: PresentationSink>(
        &self,
        handle: GateHandle<MeasurementSample>,
        sink: &mut S,
    ) -> Result<Option<SizeReport>> {
        let outcome = follow(handle, sink).await?;
        match outcome {
            GateOutcome::Success(sample) => {
                let report = self.report(sample);
                sink.measurements(&report)?;
                Ok(Some(report))
            }
            GateOutcome::Empty => {
                sink.failure(&FitError::NoDetection)?;
                Ok(None)
            }
            GateOutcome::Failure(err) => {
                sink.failure(&err)?;
                Ok(None)
            }
        }
    }
}

/// Streams progress into the sink and returns the gate's outcome.
pub async fn follow<T, S: PresentationSink>(
    handle: GateHandle<T>,
    sink: &mut S,
) -> Result<GateOutcome<T>> {
    let mut progress = handle.progress();
    let outcome = handle.outcome();
    tokio::pin!(outcome);

    loop {
        tokio::select! {
            result = &mut outcome => {
                sink.progress(*progress.borrow_and_update())?;
                return result;
            }
            changed = progress.changed() => {
                if changed.is_err() {
                    // Sender gone: the gate finished or was disposed.
                    let result = outcome.await;
                    if result.is_ok() {
                        sink.progress(*progress.borrow())?;
                    }
                    return result;
                }
                let current = *progress.borrow_and_update();
                sink.progress(current)?;
            }
        }
    }
}
