//! GET_KEY: re-fetch the card public key
//!
//! Empty request data; the success response carries the length-prefixed
//! encoded point, exactly like INITIALISE.

use gatecard_apdu_core::Command;
use gatecard_pairing::{CurvePoint, WeierstrassCurve};

use crate::codec::read_field;
use crate::constants::{cla, ins};
use crate::{Error, Result};

/// Build a GET_KEY command
pub fn command() -> Command {
    Command::new(cla::ISO7816, ins::GET_KEY, 0x00, 0x00).with_le(0x00)
}

/// Parse the success payload into the card public key
pub fn parse_payload(curve: &WeierstrassCurve, payload: &[u8]) -> Result<CurvePoint> {
    let (encoded, _) = read_field(payload, 0)?;
    curve.decode_point(encoded).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_key_frame() {
        let cmd = command();
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0x04, 0x00, 0x00, 0x00]);
    }
}
