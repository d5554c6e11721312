use crate::constants::{
    HEADER_SIZE, LIDAR_ANS_LENGTH_MEASUREMENT, LIDAR_ANS_TYPE_MEASUREMENT, LIDAR_CMD_SCAN,
    LIDAR_CMD_SET_MOTOR_PWM, LIDAR_CMD_STOP, LIDAR_CMD_SYNC_BYTE, N_READ_TRIALS, STOP_SETTLE_MS,
};
use crate::error::NavError;
use crate::numeric::xor_checksum;
use crate::packet::{validate_response_header, ResponseMode};
use crate::time::sleep_ms;
use serialport::SerialPort;
use std::io::{Read, Write};

pub(crate) fn start_scan(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    send_command(port, LIDAR_CMD_SCAN)?;
    let header = read(port, HEADER_SIZE)?;
    let mode = validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_MEASUREMENT),
        LIDAR_ANS_TYPE_MEASUREMENT,
    )?;
    if mode != ResponseMode::Multiple {
        return Err(NavError::InvalidResponseMode(0));
    }
    Ok(())
}

fn stop_scan(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    send_command(port, LIDAR_CMD_STOP)?;
    sleep_ms(STOP_SETTLE_MS);
    Ok(())
}

pub(crate) fn stop_scan_and_flush(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    stop_scan(port)?;
    flush(port)?;
    Ok(())
}

pub(crate) fn set_motor_pwm(port: &mut Box<dyn SerialPort>, pwm: u16) -> Result<(), NavError> {
    send_payload_command(port, LIDAR_CMD_SET_MOTOR_PWM, &pwm.to_le_bytes())?;
    Ok(())
}

/// Spins up the rotation motor.
///
/// USB adapters drive the motor enable line through DTR. Adapters without
/// modem lines reject the request, which only costs the motor control.
pub(crate) fn start_motor(port: &mut Box<dyn SerialPort>, pwm: u16) -> Result<(), NavError> {
    if let Err(e) = port.write_data_terminal_ready(false) {
        log::debug!("Cannot clear DTR: {e}");
    }
    set_motor_pwm(port, pwm)
}

pub(crate) fn stop_motor(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    set_motor_pwm(port, 0)?;
    sleep_ms(1);
    if let Err(e) = port.write_data_terminal_ready(true) {
        log::debug!("Cannot set DTR: {e}");
    }
    Ok(())
}

fn send_data(port: &mut Box<dyn SerialPort>, data: &[u8]) -> std::io::Result<()> {
    port.write_all(data)
}

pub(crate) fn send_command(port: &mut Box<dyn SerialPort>, command: u8) -> std::io::Result<()> {
    let data: [u8; 2] = [LIDAR_CMD_SYNC_BYTE, command];
    send_data(port, &data)
}

pub(crate) fn send_payload_command(
    port: &mut Box<dyn SerialPort>,
    command: u8,
    payload: &[u8],
) -> std::io::Result<()> {
    let mut data = vec![LIDAR_CMD_SYNC_BYTE, command, payload.len() as u8];
    data.extend_from_slice(payload);
    data.push(xor_checksum(&data));
    send_data(port, &data)
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, NavError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<(), NavError> {
    let n_read: usize = get_n_read(port).unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut packet: Vec<u8> = vec![0; n_read];
    port.read_exact(packet.as_mut_slice())?;
    Ok(())
}

pub(crate) fn read(
    port: &mut Box<dyn SerialPort>,
    data_size: usize,
) -> Result<Vec<u8>, NavError> {
    assert!(data_size > 0);
    for _ in 0..N_READ_TRIALS {
        let n_read: usize = get_n_read(port)?;

        if n_read < data_size {
            sleep_ms(10);
            continue;
        }

        let mut packet: Vec<u8> = vec![0; data_size];
        port.read_exact(packet.as_mut_slice())?;
        return Ok(packet);
    }
    Err(NavError::TimeoutError())
}
