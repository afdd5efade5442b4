use crate::core::profile::{BoundTable, SizeProfile};
use crate::domain::model::{Classification, MeasurementKey, MeasurementSample, SizeLabel, Unit};
use crate::utils::error::{FitError, Result};
use serde::Serialize;

/// Per-dimension labels behind an overall recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeBreakdown {
    pub chest: Classification,
    pub shoulder: Classification,
    pub length: Classification,
    pub overall: Classification,
}

/// Classifies a sample already expressed in `profile.unit`.
pub fn classify(sample: &MeasurementSample, profile: &SizeProfile) -> Classification {
    classify_detailed(sample, profile).overall
}

pub fn classify_detailed(sample: &MeasurementSample, profile: &SizeProfile) -> SizeBreakdown {
    let chest = dimension(
        &profile.chest,
        sample.finite(MeasurementKey::ChestCircumference).map(|c| c / 2.0),
    );
    let shoulder = dimension(&profile.shoulder, sample.finite(MeasurementKey::ShoulderWidth));
    let length = dimension(&profile.length, sample.finite(MeasurementKey::HipLength));

    SizeBreakdown {
        chest,
        shoulder,
        length,
        overall: largest(&[chest, shoulder, length]),
    }
}

/// Classifies a sample measured in `unit`, converting into the profile's unit first.
pub fn classify_in(sample: &MeasurementSample, unit: Unit, profile: &SizeProfile) -> SizeBreakdown {
    let converted = sample.map_values(|v| unit.convert(v, profile.unit));
    classify_detailed(&converted, profile)
}

/// Like [`classify_in`], but reports out-of-range as an error.
pub fn recommend(sample: &MeasurementSample, unit: Unit, profile: &SizeProfile) -> Result<SizeLabel> {
    classify_in(sample, unit, profile)
        .overall
        .size()
        .ok_or_else(|| FitError::OutOfRange {
            profile: profile.name.to_string(),
        })
}

// An undetected dimension counts as zero, the lowest label, and never as out of range.
fn dimension(table: &BoundTable, value: Option<f64>) -> Classification {
    match value {
        Some(v) => table.lookup(v),
        None => Classification::Size(SizeLabel::XS),
    }
}

// Any out-of-range dimension poisons the overall result.
fn largest(labels: &[Classification]) -> Classification {
    let mut top: Option<u8> = None;
    for classification in labels {
        match classification {
            Classification::Size(label) => {
                top = Some(top.map_or(label.rank(), |r| r.max(label.rank())))
            }
            Classification::OutOfRange => return Classification::OutOfRange,
        }
    }
    top.and_then(SizeLabel::from_rank)
        .map(Classification::Size)
        .unwrap_or(Classification::OutOfRange)
}
