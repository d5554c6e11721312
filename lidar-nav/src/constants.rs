pub(crate) const HEADER_SIZE: usize = 7;
pub(crate) const NODE_SIZE: usize = 5;
pub(crate) const LIDAR_CMD_SYNC_BYTE: u8 = 0xA5;
pub(crate) const LIDAR_ANS_SYNC_BYTE: u8 = 0x5A;
pub(crate) const LIDAR_CMD_STOP: u8 = 0x25;
pub(crate) const LIDAR_CMD_SCAN: u8 = 0x20;
pub(crate) const LIDAR_CMD_GET_DEVICE_INFO: u8 = 0x50;
pub(crate) const LIDAR_CMD_GET_DEVICE_HEALTH: u8 = 0x52;
pub(crate) const LIDAR_CMD_SET_MOTOR_PWM: u8 = 0xF0;
pub(crate) const LIDAR_ANS_TYPE_DEVINFO: u8 = 0x4;
pub(crate) const LIDAR_ANS_LENGTH_DEVINFO: u32 = 20;
pub(crate) const LIDAR_ANS_TYPE_DEVHEALTH: u8 = 0x6;
pub(crate) const LIDAR_ANS_LENGTH_DEVHEALTH: u32 = 3;
pub(crate) const LIDAR_ANS_TYPE_MEASUREMENT: u8 = 0x81;
pub(crate) const LIDAR_ANS_LENGTH_MEASUREMENT: u32 = NODE_SIZE as u32;
pub(crate) const N_READ_TRIALS: usize = 100;
pub(crate) const STOP_SETTLE_MS: u64 = 100;

pub const DEFAULT_BAUD_RATE: u32 = 115200;
pub const DEFAULT_MOTOR_PWM: u16 = 660;
pub const MAX_BUFFER_BYTES: usize = 3000;
pub const MIN_SCAN_LEN: usize = 5;
pub const POINTS_PER_UPDATE: usize = 1000;
pub const MAX_DISTANCE: f64 = 4000.;
pub const SAFE_DISTANCE: f64 = 650.;
pub const SIDE_THRESHOLD: f64 = 400.;
pub const FRONT_HALF_WIDTH: f64 = 10.;
pub const LEFT_BAND: (f64, f64) = (80., 100.);
pub const RIGHT_BAND: (f64, f64) = (260., 280.);
pub const REVERSE_HOLD_MS: u64 = 500;
pub const STOP_HOLD_MS: u64 = 200;
