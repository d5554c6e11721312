#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion command understood by the drive controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    Forward,
    Stop,
    TurnLeft,
    TurnRight,
    Reverse,
}

impl Command {
    /// Single byte token sent over the wire for this command.
    pub fn code(self) -> u8 {
        match self {
            Command::Forward => b'f',
            Command::Stop => b's',
            Command::TurnLeft => b'l',
            Command::TurnRight => b'r',
            Command::Reverse => b'b',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Command::Forward => "forward",
            Command::Stop => "stop",
            Command::TurnLeft => "turn-left",
            Command::TurnRight => "turn-right",
            Command::Reverse => "reverse",
        };
        write!(f, "{}", name)
    }
}
