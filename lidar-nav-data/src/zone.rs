#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Obstacle occupancy of the three watched sectors, derived from one scan.
///
/// The flags are independent and may all be set at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneState {
    pub front: bool,
    pub left: bool,
    pub right: bool,
}

impl ZoneState {
    pub fn is_clear(&self) -> bool {
        !(self.front || self.left || self.right)
    }
}
