pub mod command;
pub mod device_info;
pub mod health;
pub mod scan;
pub mod zone;

pub use command::Command;
pub use device_info::DeviceInfo;
pub use health::{DeviceHealth, HealthStatus};
pub use scan::{Sample, Scan};
pub use zone::ZoneState;
