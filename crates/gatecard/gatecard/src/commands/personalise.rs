//! PERSONALISE: replace the card's attribute store
//!
//! Request data is a 2-byte attribute count followed by, per attribute,
//! a 1-byte id, the length-prefixed certificate point and the
//! length-prefixed value. The success response has no payload.

use bytes::{BufMut, BytesMut};
use num_bigint::BigUint;

use gatecard_apdu_core::Command;
use gatecard_pairing::{CurvePoint, WeierstrassCurve};

use crate::codec::{put_bytes, put_uint};
use crate::constants::{cla, ins};

/// Build a PERSONALISE command
///
/// Callers must have checked that the three slices have equal lengths.
pub fn command(
    curve: &WeierstrassCurve,
    ids: &[u8],
    values: &[BigUint],
    certificates: &[CurvePoint],
) -> Command {
    debug_assert_eq!(ids.len(), values.len());
    debug_assert_eq!(ids.len(), certificates.len());

    let mut data = BytesMut::new();
    data.put_u16(ids.len() as u16);
    for ((&id, value), certificate) in ids.iter().zip(values).zip(certificates) {
        data.put_u8(id);
        put_bytes(&mut data, &curve.encode_point(certificate));
        put_uint(&mut data, value);
    }

    Command::new_with_data(cla::ISO7816, ins::PERSONALISE, 0x00, 0x00, data.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{read_field, read_uint};
    use gatecard_pairing::{BnCurve, KeyLength};

    #[test]
    fn test_personalise_frame_layout() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let cert = curve.base().mul(&BigUint::from(9u32), curve.generator());
        let cmd = command(
            curve.base(),
            &[1, 4],
            &[BigUint::from(100_001u32), BigUint::from(400_004u32)],
            &[cert.clone(), cert.clone()],
        );

        let data = cmd.data.unwrap();
        assert_eq!(&data[..2], &[0x00, 0x02]);

        let mut offset = 2;
        for (expected_id, expected_value) in [(1u8, 100_001u32), (4, 400_004)] {
            assert_eq!(data[offset], expected_id);
            let (encoded_cert, next) = read_field(&data, offset + 1).unwrap();
            assert_eq!(encoded_cert, curve.base().encode_point(&cert));
            let (value, next) = read_uint(&data, next).unwrap();
            assert_eq!(value, BigUint::from(expected_value));
            offset = next;
        }
        assert_eq!(offset, data.len());
    }
}
