pub(crate) fn to_u32(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .fold(0u32, |acc, b| (acc << 8) + (*b as u32))
}

pub(crate) fn to_angle(bit1: u8, bit2: u8) -> f64 {
    let a = ((bit1 as u16) >> 1) + ((bit2 as u16) << 7);
    (a as f64) / 64.
}

pub(crate) fn calc_distance(b1: u8, b2: u8) -> f64 {
    let d = (b1 as u16) + ((b2 as u16) << 8);
    (d as f64) / 4.
}

pub(crate) fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u32() {
        assert_eq!(to_u32(&[0x05, 0x00, 0x00, 0x40]), 0x40000005);
        assert_eq!(to_u32(&[0x14]), 0x14);
    }

    #[test]
    fn test_to_angle() {
        // 90 degrees = 5760 in q6 = 0b1011010_000000
        let q6: u16 = 90 * 64;
        let b1 = (((q6 & 0x7F) as u8) << 1) | 1;
        let b2 = (q6 >> 7) as u8;
        assert_eq!(to_angle(b1, b2), 90.);
        assert_eq!(to_angle(0x01, 0x00), 0.);
    }

    #[test]
    fn test_calc_distance() {
        assert_eq!(calc_distance(0xB0, 0x04), 300.);
        assert_eq!(calc_distance(0x01, 0x00), 0.25);
    }

    #[test]
    fn test_xor_checksum() {
        assert_eq!(xor_checksum(&[0xA5, 0xF0, 0x02, 0x94, 0x02]), 0xC1);
        assert_eq!(xor_checksum(&[]), 0);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&[0xA5, 0x5A]), "A5 5A");
    }
}
