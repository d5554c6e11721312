#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One range-bearing measurement.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Return strength reported by the device. Not used for obstacle detection.
    pub quality: u8,
    /// Bearing in degrees, in [0, 360).
    pub angle_degree: f64,
    /// Range in millimeters. Zero means the laser pulse did not return.
    pub distance_mm: f64,
}

impl Sample {
    pub fn new(quality: u8, angle_degree: f64, distance_mm: f64) -> Sample {
        Sample {
            quality,
            angle_degree,
            distance_mm,
        }
    }
}

/// Struct to hold one lap of lidar scan data.
///
/// A scan cannot be modified once built; consumers only get a shared view of
/// its samples.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scan {
    samples: Vec<Sample>,
}

impl Scan {
    pub fn from_samples(samples: Vec<Sample>) -> Scan {
        Scan { samples }
    }

    /// Builds a scan from the first `limit` samples, dropping the rest.
    pub fn truncated(mut samples: Vec<Sample>, limit: usize) -> Scan {
        samples.truncate(limit);
        Scan { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a Scan {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
