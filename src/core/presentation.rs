use crate::core::gate::GateProgress;
use crate::core::report::SizeReport;
use crate::domain::model::MeasurementKey;
use crate::utils::error::{ErrorKind, FitError, Result};
use std::io::Write;

/// Where revealed results end up.
pub trait PresentationSink {
    fn progress(&mut self, progress: GateProgress) -> Result<()>;
    fn measurements(&mut self, report: &SizeReport) -> Result<()>;
    fn try_on(&mut self, saved_to: &str) -> Result<()>;
    fn failure(&mut self, error: &FitError) -> Result<()>;
}

/// Plain-text sink for terminals and logs.
pub struct ConsoleSink<W: Write> {
    out: W,
    show_progress: bool,
    last_percent: Option<u8>,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_progress: true,
            last_percent: None,
        }
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PresentationSink for ConsoleSink<W> {
    fn progress(&mut self, progress: GateProgress) -> Result<()> {
        if !self.show_progress || self.last_percent == Some(progress.percent) {
            return Ok(());
        }
        self.last_percent = Some(progress.percent);
        write!(self.out, "\rProcessing... {:>3}%", progress.percent)?;
        if progress.percent >= 100 {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn measurements(&mut self, report: &SizeReport) -> Result<()> {
        let suffix = report.unit.suffix();
        for key in MeasurementKey::ALL {
            match report.sample.get(key).filter(|v| v.is_finite()) {
                Some(value) => writeln!(self.out, "{}: {:.2} {}", key.label(), value, suffix)?,
                None => writeln!(self.out, "{}: N/A", key.label())?,
            }
        }
        for rec in &report.recommendations {
            writeln!(
                self.out,
                "Recommended size ({}): {}",
                rec.profile, rec.breakdown.overall
            )?;
        }
        Ok(())
    }

    fn try_on(&mut self, saved_to: &str) -> Result<()> {
        writeln!(self.out, "Try-on image saved to: {}", saved_to)?;
        Ok(())
    }

    fn failure(&mut self, error: &FitError) -> Result<()> {
        match error.kind() {
            ErrorKind::NoDetection => writeln!(self.out, "Recommended size: N/A")?,
            _ => writeln!(self.out, "Error: {}", error.user_friendly_message())?,
        }
        writeln!(self.out, "Hint: {}", error.recovery_suggestion())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gate::GatePhase;
    use crate::domain::model::{MeasurementSample, Unit};

    fn render(f: impl FnOnce(&mut ConsoleSink<Vec<u8>>)) -> String {
        let mut sink = ConsoleSink::new(Vec::new());
        f(&mut sink);
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_measurements_render_two_decimals_and_labels() {
        let sample = MeasurementSample {
            thigh: None,
            ..MeasurementSample::new(91.0, 44.0, 68.0, 0.0)
        };
        let report = SizeReport::from_sample(sample, Unit::Centimeters);

        let text = render(|sink| sink.measurements(&report).unwrap());
        assert!(text.contains("Chest Circumference: 91.00 cm"));
        assert!(text.contains("Thigh Circumference: N/A"));
        assert!(text.contains("Recommended size (Default): M"));
        assert!(text.contains("Recommended size (East): M"));
    }

    #[test]
    fn test_failures_render_by_kind() {
        let text = render(|sink| sink.failure(&FitError::NoDetection).unwrap());
        assert!(text.contains("Recommended size: N/A"));

        let text = render(|sink| sink.failure(&FitError::conversion("truncated")).unwrap());
        assert!(text.contains("Error: Failed to prepare image."));
    }

    #[test]
    fn test_progress_skips_repeats() {
        let text = render(|sink| {
            for percent in [10, 10, 100] {
                sink.progress(GateProgress {
                    percent,
                    phase: GatePhase::Pending,
                })
                .unwrap();
            }
        });
        assert_eq!(text.matches("Processing").count(), 2);
        assert!(text.ends_with("100%\n"));
    }
}
