use crate::constants::{HEADER_SIZE, LIDAR_ANS_SYNC_BYTE, LIDAR_CMD_SYNC_BYTE, NODE_SIZE};
use crate::error::NavError;
use crate::numeric::{calc_distance, to_angle, to_string, to_u32};

/// How the device delivers the answer following a response descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ResponseMode {
    Single,
    Multiple,
}

/// One decoded measurement node of the legacy scan answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) new_scan: bool,
    pub(crate) quality: u8,
    pub(crate) angle_degree: f64,
    pub(crate) distance_mm: f64,
}

/// Checks a response descriptor and returns its response mode.
pub(crate) fn validate_response_header(
    header: &[u8],
    maybe_response_length: Option<u32>,
    type_code: u8,
) -> Result<ResponseMode, NavError> {
    if header.len() != HEADER_SIZE {
        return Err(NavError::InvalidHeaderLength(header.len()));
    }
    if header[0..2] != [LIDAR_CMD_SYNC_BYTE, LIDAR_ANS_SYNC_BYTE] {
        return Err(NavError::InvalidMagicNumber(to_string(&header[0..2])));
    }
    let length_and_mode = to_u32(&header[2..6]);
    let response_length = length_and_mode & 0x3FFF_FFFF;
    if let Some(len) = maybe_response_length {
        if response_length != len {
            return Err(NavError::InvalidResponseLength(
                len as usize,
                response_length as usize,
            ));
        }
    }
    if header[6] != type_code {
        return Err(NavError::InvalidTypeCode(
            type_code.into(),
            header[6].into(),
        ));
    }
    match length_and_mode >> 30 {
        0 => Ok(ResponseMode::Single),
        1 => Ok(ResponseMode::Multiple),
        mode => Err(NavError::InvalidResponseMode(mode as u8)),
    }
}

pub(crate) fn parse_node(raw: &[u8]) -> Result<Node, NavError> {
    assert_eq!(raw.len(), NODE_SIZE);
    let new_scan = raw[0] & 0x01;
    let inversed_new_scan = (raw[0] >> 1) & 0x01;
    if new_scan == inversed_new_scan {
        return Err(NavError::ScanFlagMismatch(raw[0]));
    }
    if raw[1] & 0x01 != 1 {
        return Err(NavError::CheckBitMissing(raw[1]));
    }
    Ok(Node {
        new_scan: new_scan == 1,
        quality: raw[0] >> 2,
        angle_degree: to_angle(raw[1], raw[2]),
        distance_mm: calc_distance(raw[3], raw[4]),
    })
}

#[cfg(test)]
pub(crate) fn encode_node(new_scan: bool, quality: u8, angle_degree: f64, distance_mm: f64) -> [u8; 5] {
    let flags = if new_scan { 0b01 } else { 0b10 };
    let angle_q6 = (angle_degree * 64.) as u16;
    let distance_q2 = (distance_mm * 4.) as u16;
    [
        (quality << 2) | flags,
        (((angle_q6 & 0x7F) as u8) << 1) | 0x01,
        (angle_q6 >> 7) as u8,
        (distance_q2 & 0xFF) as u8,
        (distance_q2 >> 8) as u8,
    ]
}
