#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Health status reported by the rangefinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HealthStatus {
    /// The device works normally
    Good,
    /// The device works but has detected a potential problem
    Warning,
    /// The device refuses to scan until it is reset
    Error,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceHealth {
    pub status: HealthStatus,
    pub error_code: u16,
}
