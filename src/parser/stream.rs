use crate::error::{FlightLogError, Result};

/// Little-endian reader over one record's payload
pub struct LogDataStream<'a> {
    data: &'a [u8],
    pub pos: usize,
    end: usize,
    pub eof: bool,
}

impl<'a> LogDataStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
            eof: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            self.eof = true;
            return Err(FlightLogError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos < self.end {
            let byte = self.data[self.pos];
            self.pos += 1;
            Ok(byte)
        } else {
            self.eof = true;
            Err(FlightLogError::UnexpectedEof)
        }
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a NUL-padded fixed-width ASCII string
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(fixed_ascii(bytes))
    }
}

/// Decode a NUL-padded ASCII field, stopping at the first NUL
pub fn fixed_ascii(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let data = [0x34, 0x12, 0xff, 0xff, 0xff, 0xff, 0x01];
        let mut stream = LogDataStream::new(&data);
        assert_eq!(stream.read_u16().unwrap(), 0x1234);
        assert_eq!(stream.read_i32().unwrap(), -1);
        assert_eq!(stream.read_u8().unwrap(), 1);
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_sets_eof() {
        let data = [0x01, 0x02];
        let mut stream = LogDataStream::new(&data);
        assert!(matches!(stream.read_u32(), Err(FlightLogError::UnexpectedEof)));
        assert!(stream.eof);
        // A failed read does not consume anything
        assert_eq!(stream.pos, 0);
    }

    #[test]
    fn test_fixed_string_stops_at_nul() {
        let data = *b"GPS\0ATT\0";
        let mut stream = LogDataStream::new(&data);
        assert_eq!(stream.read_fixed_string(4).unwrap(), "GPS");
        assert_eq!(stream.read_fixed_string(4).unwrap(), "ATT");
    }

    #[test]
    fn test_float_reads() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f64).to_le_bytes());
        let mut stream = LogDataStream::new(&data);
        assert_eq!(stream.read_f32().unwrap(), 1.5);
        assert_eq!(stream.read_f64().unwrap(), -2.25);
    }
}
