use crate::core::classifier::{classify_in, SizeBreakdown};
use crate::core::profile::ProfileName;
use crate::domain::model::{MeasurementSample, Unit};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRecommendation {
    pub profile: ProfileName,
    pub breakdown: SizeBreakdown,
}

/// A revealed sample together with its size under every regional profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    pub sample: MeasurementSample,
    pub unit: Unit,
    pub recommendations: Vec<ProfileRecommendation>,
}

impl SizeReport {
    pub fn from_sample(sample: MeasurementSample, unit: Unit) -> Self {
        let recommendations = ProfileName::ALL
            .iter()
            .map(|&profile| ProfileRecommendation {
                profile,
                breakdown: classify_in(&sample, unit, profile.profile()),
            })
            .collect();

        Self {
            sample,
            unit,
            recommendations,
        }
    }

    pub fn for_profile(&self, profile: ProfileName) -> Option<&ProfileRecommendation> {
        self.recommendations.iter().find(|r| r.profile == profile)
    }
}
