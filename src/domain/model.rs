use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Keys of the measurement map returned by the measurement service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKey {
    ChestCircumference,
    ShoulderWidth,
    HipLength,
    ThighCircumference,
}

impl MeasurementKey {
    pub const ALL: [MeasurementKey; 4] = [
        MeasurementKey::ChestCircumference,
        MeasurementKey::ShoulderWidth,
        MeasurementKey::HipLength,
        MeasurementKey::ThighCircumference,
    ];

    /// Name used on the wire and in displays.
    pub fn label(self) -> &'static str {
        match self {
            MeasurementKey::ChestCircumference => "Chest Circumference",
            MeasurementKey::ShoulderWidth => "Shoulder Width",
            MeasurementKey::HipLength => "Hip Length",
            MeasurementKey::ThighCircumference => "Thigh Circumference",
        }
    }
}

/// One capture's worth of body measurements, in the service's configured unit.
///
/// Every value is optional: the service reports `null` (or omits the key) for
/// anything it could not measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSample {
    #[serde(rename = "Chest Circumference", default)]
    pub chest: Option<f64>,
    #[serde(rename = "Shoulder Width", default)]
    pub shoulder: Option<f64>,
    #[serde(rename = "Hip Length", default)]
    pub hip: Option<f64>,
    #[serde(rename = "Thigh Circumference", default)]
    pub thigh: Option<f64>,
}

impl MeasurementSample {
    pub fn new(chest: f64, shoulder: f64, hip: f64, thigh: f64) -> Self {
        Self {
            chest: Some(chest),
            shoulder: Some(shoulder),
            hip: Some(hip),
            thigh: Some(thigh),
        }
    }

    pub fn get(&self, key: MeasurementKey) -> Option<f64> {
        match key {
            MeasurementKey::ChestCircumference => self.chest,
            MeasurementKey::ShoulderWidth => self.shoulder,
            MeasurementKey::HipLength => self.hip,
            MeasurementKey::ThighCircumference => self.thigh,
        }
    }

    /// The value for `key` if it is present and finite.
    pub fn finite(&self, key: MeasurementKey) -> Option<f64> {
        self.get(key).filter(|v| v.is_finite())
    }

    /// True when no key carries a finite number.
    pub fn is_empty(&self) -> bool {
        MeasurementKey::ALL
            .iter()
            .all(|&key| self.finite(key).is_none())
    }

    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            chest: self.chest.map(&f),
            shoulder: self.shoulder.map(&f),
            hip: self.hip.map(&f),
            thigh: self.thigh.map(&f),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "cm")]
    Centimeters,
    #[serde(alias = "in")]
    Inches,
}

impl Unit {
    pub const CM_PER_INCH: f64 = 2.54;

    pub fn convert(self, value: f64, to: Unit) -> f64 {
        match (self, to) {
            (Unit::Centimeters, Unit::Inches) => value / Self::CM_PER_INCH,
            (Unit::Inches, Unit::Centimeters) => value * Self::CM_PER_INCH,
            _ => value,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Centimeters => "cm",
            Unit::Inches => "inch",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cm" | "centimeters" => Ok(Unit::Centimeters),
            "in" | "inch" | "inches" => Ok(Unit::Inches),
            other => Err(format!("unknown unit '{}', expected cm or in", other)),
        }
    }
}

/// Garment size on the six-point ordinal scale. Ordering follows rank, not text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeLabel {
    XS = 0,
    S = 1,
    M = 2,
    L = 3,
    XL = 4,
    XXL = 5,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 6] = [
        SizeLabel::XS,
        SizeLabel::S,
        SizeLabel::M,
        SizeLabel::L,
        SizeLabel::XL,
        SizeLabel::XXL,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeLabel::XS => "XS",
            SizeLabel::S => "S",
            SizeLabel::M => "M",
            SizeLabel::L => "L",
            SizeLabel::XL => "XL",
            SizeLabel::XXL => "XXL",
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one dimension or a whole sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Size(SizeLabel),
    OutOfRange,
}

impl Classification {
    pub fn size(self) -> Option<SizeLabel> {
        match self {
            Classification::Size(label) => Some(label),
            Classification::OutOfRange => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Size(label) => label.fmt(f),
            Classification::OutOfRange => f.write_str("Size out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentRegion {
    #[default]
    Upper,
    Lower,
    Full,
}

impl GarmentRegion {
    pub fn as_str(self) -> &'static str {
        match self {
            GarmentRegion::Upper => "upper",
            GarmentRegion::Lower => "lower",
            GarmentRegion::Full => "full",
        }
    }
}

impl std::str::FromStr for GarmentRegion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(GarmentRegion::Upper),
            "lower" => Ok(GarmentRegion::Lower),
            "full" => Ok(GarmentRegion::Full),
            other => Err(format!(
                "unknown garment region '{}', expected upper, lower or full",
                other
            )),
        }
    }
}

/// Where an image comes from before it is encoded for the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Bytes(Vec<u8>),
    File(PathBuf),
    Url(String),
}

impl ImageSource {
    /// Treats `http(s)://` and `data:` references as URLs and anything else as a path.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http://")
            || reference.starts_with("https://")
            || reference.starts_with("data:")
        {
            ImageSource::Url(reference.to_string())
        } else {
            ImageSource::File(PathBuf::from(reference))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentSelection {
    pub garment: Option<ImageSource>,
    pub region: GarmentRegion,
}

/// Composite image returned by the try-on endpoint, still base64-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryOnImage {
    #[serde(default)]
    pub image: Option<String>,
}
