//! Protocol constants

/// Application identifier of the on-card credential applet
pub const GATECARD_AID: [u8; 6] = [0x35, 0x01, 0x02, 0x03, 0x04, 0x07];

/// Class bytes
pub mod cla {
    /// Plain ISO 7816-4 class
    pub const ISO7816: u8 = 0x00;
}

/// Instruction bytes
pub mod ins {
    /// Select the applet by AID
    pub const SELECT: u8 = 0xA4;
    /// Install the curve domain and generate the card keypair
    pub const INITIALISE: u8 = 0x01;
    /// Replace the attribute store
    pub const PERSONALISE: u8 = 0x02;
    /// Request a blinded attribute proof
    pub const GET_ATTRIBUTE: u8 = 0x03;
    /// Re-fetch the card public key
    pub const GET_KEY: u8 = 0x04;
}

/// P1 values for SELECT
pub mod select_p1 {
    /// Select by application name
    pub const BY_NAME: u8 = 0x04;
}
