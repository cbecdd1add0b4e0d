//! Length-prefixed field codec
//!
//! Every variable-length quantity on the wire is carried as a 2-byte
//! big-endian length followed by that many bytes. Integers are big-endian
//! magnitudes with no sign padding (zero is a single `0x00` byte); curve
//! points are carried as their uncompressed encoding. Fields are read
//! sequentially, each decode returning the offset of the next field.

use bytes::{BufMut, BytesMut};
use num_bigint::BigUint;

/// Errors raised while decoding length-prefixed fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    /// Fewer than two bytes remain where a length prefix was expected
    #[error("truncated length prefix")]
    TruncatedPrefix,

    /// The declared field length exceeds the remaining buffer
    #[error("declared length {declared} exceeds remaining {remaining} bytes")]
    Overrun {
        /// Length announced by the prefix
        declared: usize,
        /// Bytes actually remaining after the prefix
        remaining: usize,
    },
}

/// Append a length-prefixed byte field
pub fn put_bytes(buf: &mut BytesMut, field: &[u8]) {
    buf.put_u16(field.len() as u16);
    buf.put_slice(field);
}

/// Append a length-prefixed non-negative integer
///
/// The magnitude is big-endian with no leading sign byte; zero encodes
/// with length 1 as a single `0x00`.
pub fn put_uint(buf: &mut BytesMut, value: &BigUint) {
    put_bytes(buf, &value.to_bytes_be());
}

/// Read a length-prefixed field at `offset`
///
/// Returns the field contents and the offset immediately after it.
pub fn read_field(data: &[u8], offset: usize) -> Result<(&[u8], usize), FramingError> {
    let rest = data.get(offset..).unwrap_or_default();
    if rest.len() < 2 {
        return Err(FramingError::TruncatedPrefix);
    }

    let declared = usize::from(u16::from_be_bytes([rest[0], rest[1]]));
    let remaining = rest.len() - 2;
    if declared > remaining {
        return Err(FramingError::Overrun {
            declared,
            remaining,
        });
    }

    Ok((&rest[2..2 + declared], offset + 2 + declared))
}

/// Read a length-prefixed non-negative integer at `offset`
pub fn read_uint(data: &[u8], offset: usize) -> Result<(BigUint, usize), FramingError> {
    let (field, next) = read_field(data, offset)?;
    Ok((BigUint::from_bytes_be(field), next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_uint_round_trip() {
        let values = [
            BigUint::zero(),
            BigUint::from(1u32),
            BigUint::from(0x80u32),
            BigUint::parse_bytes(b"285935155822567759380819473491615908643", 10).unwrap(),
        ];

        let mut buf = BytesMut::new();
        for value in &values {
            put_uint(&mut buf, value);
        }

        let data = buf.freeze();
        let mut offset = 0;
        for value in &values {
            let (decoded, next) = read_uint(&data, offset).unwrap();
            assert_eq!(&decoded, value);
            offset = next;
        }
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_zero_encodes_as_one_byte() {
        let mut buf = BytesMut::new();
        put_uint(&mut buf, &BigUint::zero());
        assert_eq!(buf.as_ref(), &[0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_high_bit_magnitude_has_no_sign_byte() {
        // 0x80 must encode as a single magnitude byte, not 0x00 0x80
        let mut buf = BytesMut::new();
        put_uint(&mut buf, &BigUint::from(0x80u32));
        assert_eq!(buf.as_ref(), &[0x00, 0x01, 0x80]);
        let (decoded, _) = read_uint(&buf, 0).unwrap();
        assert_eq!(decoded, BigUint::from(0x80u32));
    }

    #[test]
    fn test_truncated_prefix() {
        assert_eq!(read_field(&[0x00], 0), Err(FramingError::TruncatedPrefix));
        assert_eq!(read_field(&[], 0), Err(FramingError::TruncatedPrefix));
        assert_eq!(
            read_field(&[0x00, 0x01, 0xAA], 3),
            Err(FramingError::TruncatedPrefix)
        );
    }

    #[test]
    fn test_overrun() {
        assert_eq!(
            read_field(&[0x00, 0x05, 0x01, 0x02], 0),
            Err(FramingError::Overrun {
                declared: 5,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_sequential_fields() {
        let mut buf = BytesMut::new();
        put_bytes(&mut buf, &[0xAA, 0xBB]);
        put_bytes(&mut buf, &[]);
        put_bytes(&mut buf, &[0xCC]);

        let (first, offset) = read_field(&buf, 0).unwrap();
        assert_eq!(first, &[0xAA, 0xBB]);
        let (second, offset) = read_field(&buf, offset).unwrap();
        assert!(second.is_empty());
        let (third, offset) = read_field(&buf, offset).unwrap();
        assert_eq!(third, &[0xCC]);
        assert_eq!(offset, buf.len());
    }
}
