//! GET_ATTRIBUTE: request a blinded attribute proof
//!
//! Request data is the 1-byte attribute id and the length-prefixed nonce
//! point. The success response is four length-prefixed integers in fixed
//! order: signed nonce, blinded key, blinded signature, value.

use bytes::{BufMut, BytesMut};

use gatecard_apdu_core::Command;
use gatecard_pairing::{CurvePoint, WeierstrassCurve};

use crate::codec::{put_bytes, read_uint};
use crate::constants::{cla, ins};
use crate::types::AttributeProof;
use crate::Result;

/// Build a GET_ATTRIBUTE command
pub fn command(curve: &WeierstrassCurve, id: u8, nonce: &CurvePoint) -> Command {
    let mut data = BytesMut::new();
    data.put_u8(id);
    put_bytes(&mut data, &curve.encode_point(nonce));

    Command::new_with_data(cla::ISO7816, ins::GET_ATTRIBUTE, 0x00, 0x00, data.freeze())
        .with_le(0x00)
}

/// Parse the success payload into an [`AttributeProof`]
pub fn parse_payload(payload: &[u8]) -> Result<AttributeProof> {
    let (signed_nonce, offset) = read_uint(payload, 0)?;
    let (blinded_key, offset) = read_uint(payload, offset)?;
    let (blinded_signature, offset) = read_uint(payload, offset)?;
    let (value, _) = read_uint(payload, offset)?;

    Ok(AttributeProof {
        signed_nonce,
        blinded_key,
        blinded_signature,
        value,
    })
}
