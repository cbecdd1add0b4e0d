//! INITIALISE: install the curve domain, receive the card public key
//!
//! Request data is the concatenation of the length-prefixed fields
//! `(p, r, a, b, g)`; the success response carries the length-prefixed
//! encoded card public key.

use bytes::BytesMut;

use gatecard_apdu_core::Command;
use gatecard_pairing::{CurveDomain, CurvePoint, WeierstrassCurve};

use crate::codec::{put_bytes, put_uint, read_field};
use crate::constants::{cla, ins};
use crate::{Error, Result};

/// Build an INITIALISE command for the given domain
pub fn command(domain: &CurveDomain) -> Command {
    let encoded_generator = domain.curve.encode_point(&domain.generator);
    let expected = encoded_generator.len() as u8;

    let mut data = BytesMut::new();
    put_uint(&mut data, domain.curve.prime());
    put_uint(&mut data, &domain.order);
    put_uint(&mut data, domain.curve.coefficient_a());
    put_uint(&mut data, domain.curve.coefficient_b());
    put_bytes(&mut data, &encoded_generator);

    Command::new_with_data(cla::ISO7816, ins::INITIALISE, 0x00, 0x00, data.freeze())
        .with_le(expected)
}

/// Parse the success payload into the card public key
pub fn parse_payload(curve: &WeierstrassCurve, payload: &[u8]) -> Result<CurvePoint> {
    let (encoded, _) = read_field(payload, 0)?;
    curve.decode_point(encoded).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::read_uint;
    use gatecard_pairing::{BnCurve, KeyLength};

    #[test]
    fn test_initialise_frame_carries_domain_fields() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let domain = curve.domain();
        let cmd = command(&domain);
        assert_eq!(cmd.ins, ins::INITIALISE);

        let data = cmd.data.unwrap();
        let (p, offset) = read_uint(&data, 0).unwrap();
        let (r, offset) = read_uint(&data, offset).unwrap();
        let (a, offset) = read_uint(&data, offset).unwrap();
        let (b, offset) = read_uint(&data, offset).unwrap();
        let (g, offset) = read_field(&data, offset).unwrap();

        assert_eq!(&p, domain.curve.prime());
        assert_eq!(&r, &domain.order);
        assert_eq!(&a, domain.curve.coefficient_a());
        assert_eq!(&b, domain.curve.coefficient_b());
        assert_eq!(g, domain.curve.encode_point(&domain.generator));
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_parse_payload_round_trip() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let point = curve
            .base()
            .mul(&num_bigint::BigUint::from(77u32), curve.generator());

        let mut payload = BytesMut::new();
        put_bytes(&mut payload, &curve.base().encode_point(&point));
        assert_eq!(parse_payload(curve.base(), &payload).unwrap(), point);
    }

    #[test]
    fn test_parse_payload_rejects_truncation() {
        let curve = BnCurve::new(KeyLength::Bits128);
        assert!(matches!(
            parse_payload(curve.base(), &[0x00, 0x10, 0x04]),
            Err(Error::Framing(_))
        ));
    }
}
