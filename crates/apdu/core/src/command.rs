//! APDU command definitions
//!
//! Short-form APDU commands according to ISO/IEC 7816-4: a four byte
//! header (CLA, INS, P1, P2), an optional Lc-prefixed data field and an
//! optional Le byte.

use bytes::{BufMut, Bytes, BytesMut};

use crate::Error;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected response length (optional)
    pub le: Option<u8>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }

    /// Calculate length of the serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;
        if let Some(data) = &self.data {
            length += 1 + data.len();
        }
        if self.le.is_some() {
            length += 1;
        }
        length
    }

    /// Convert to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() > 4 {
            let lc = data[4] as usize;

            if data.len() == 5 {
                // Only Le present, no data
                command.le = Some(data[4]);
            } else if data.len() >= 5 + lc {
                if lc > 0 {
                    command.data = Some(Bytes::copy_from_slice(&data[5..5 + lc]));
                }
                match data.len() - (5 + lc) {
                    0 => {}
                    1 => command.le = Some(data[5 + lc]),
                    _ => return Err(Error::InvalidCommandLength(data.len())),
                }
            } else {
                return Err(Error::InvalidCommandLength(data.len()));
            }
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let data = Bytes::from_static(&[0x35, 0x01, 0x02, 0x03, 0x04, 0x07]);
        let cmd = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, data).with_le(0x00);
        let bytes = cmd.to_bytes();

        assert_eq!(bytes[0], 0x00); // CLA
        assert_eq!(bytes[1], 0xA4); // INS
        assert_eq!(bytes[2], 0x04); // P1
        assert_eq!(bytes[3], 0x00); // P2
        assert_eq!(bytes[4], 0x06); // Lc
        assert_eq!(&bytes[5..11], &[0x35, 0x01, 0x02, 0x03, 0x04, 0x07]);
        assert_eq!(bytes[11], 0x00); // Le
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0x04, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new(0x00, 0x04, 0x00, 0x00).with_le(0xFF);
        assert_eq!(cmd2.command_length(), 5);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd3 = Command::new_with_data(0x00, 0x02, 0x00, 0x00, data.clone());
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = Command::new_with_data(0x00, 0x02, 0x00, 0x00, data).with_le(0xFF);
        assert_eq!(cmd4.command_length(), 9);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(cmd.ins, 0xA4);
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Data, no Le
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(cmd.data.as_ref().unwrap().as_ref(), &[0x01, 0x02, 0x03]);
        assert!(cmd.le.is_none());

        // Data and Le
        let cmd =
            Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03, 0x09]).unwrap();
        assert_eq!(cmd.data.as_ref().unwrap().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(cmd.le, Some(0x09));

        // Le only
        let cmd = Command::from_bytes(&[0x00, 0x04, 0x00, 0x00, 0x41]).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(0x41));

        // Truncated data field
        assert!(Command::from_bytes(&[0x00, 0x02, 0x00, 0x00, 0x08, 0x01]).is_err());
        assert!(Command::from_bytes(&[0x00, 0x02]).is_err());
    }

    #[test]
    fn test_command_round_trip() {
        let cmd = Command::new_with_data(0x00, 0x03, 0x00, 0x00, vec![0x01, 0xAA, 0xBB]).with_le(9);
        let parsed = Command::from_bytes(&cmd.to_bytes()).unwrap();
        assert_eq!(parsed, cmd);
    }
}
