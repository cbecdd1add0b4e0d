//! SELECT: address the credential applet by AID

use gatecard_apdu_core::Command;

use crate::constants::{cla, ins, select_p1};

/// Build a SELECT command for the given application identifier
pub fn command(aid: impl Into<Vec<u8>>) -> Command {
    Command::new_with_data(cla::ISO7816, ins::SELECT, select_p1::BY_NAME, 0x00, aid.into())
        .with_le(0x00)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GATECARD_AID;
    use hex_literal::hex;

    #[test]
    fn test_select_frame() {
        let cmd = command(GATECARD_AID);
        assert_eq!(cmd.to_bytes().as_ref(), hex!("00A4040006350102030407 00"));
    }
}
