//! Core types for APDU (Application Protocol Data Unit) communication
//!
//! This crate provides the foundational pieces used by the rest of the
//! gatecard stack to talk to a card:
//!
//! - Building and parsing short APDU commands and responses
//! - Status word interpretation
//! - The [`CardTransport`] abstraction over physical channels
//!
//! It has no knowledge of the credential protocol itself; higher layers
//! assemble instruction payloads and interpret response payloads.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;
pub mod status;
pub mod transport;

mod error;
pub use error::{Error, Result};

pub use command::Command;
pub use response::Response;
pub use status::StatusWord;
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, Response, Result, StatusWord,
        response::StatusError,
        transport::{CardTransport, TransportError},
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_reexports() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.cla, 0x00);
        assert_eq!(cmd.ins, 0xA4);

        let resp = Response::success(Some(Bytes::from_static(&[0x01, 0x02, 0x03])));
        assert!(resp.is_success());
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
