//! Transport traits for APDU communication with cards
//!
//! A transport is responsible for sending and receiving raw APDU bytes.
//! It has no knowledge of command structure or protocol details.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

/// Transport error type
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error
    #[error("failed to connect to device")]
    Connection,

    /// Transmission error
    #[error("failed to transmit data")]
    Transmission,

    /// Device error
    #[error("device error")]
    Device,

    /// Status word error during connection establishment
    #[error("status word error: {0:#06X}")]
    StatusWord(u16),

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a new status word error from individual bytes
    pub const fn status_word_bytes(sw1: u8, sw2: u8) -> Self {
        Self::StatusWord(((sw1 as u16) << 8) | (sw2 as u16))
    }

    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }
}

/// Trait for card transports
///
/// Implementations own the physical (or simulated) channel. A failed
/// transmission must invalidate any cached connection handle so that the
/// next call reconnects transparently.
pub trait CardTransport: Send + fmt::Debug {
    /// Send raw APDU bytes to the card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = ?hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    ///
    /// This is the method that concrete implementations should override.
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a card
    fn is_connected(&self) -> bool;

    /// Reset the transport connection
    fn reset(&mut self) -> Result<(), TransportError>;
}

#[cfg(test)]
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub(crate) struct MockTransport {
    /// Mock responses to return
    pub responses: Vec<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
}

#[cfg(test)]
impl MockTransport {
    pub fn new(responses: Vec<Bytes>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
            connected: true,
        }
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission);
        }

        // Either clone the single response or take the next one
        if self.responses.len() == 1 {
            Ok(self.responses[0].clone())
        } else {
            Ok(self.responses.remove(0))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        self.commands.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transport_replay() {
        let mut transport = MockTransport::new(vec![
            Bytes::from_static(&[0x01, 0x90, 0x00]),
            Bytes::from_static(&[0x6A, 0x83]),
        ]);

        let first = transport.transmit_raw(&[0x00, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!(first.as_ref(), &[0x01, 0x90, 0x00]);
        let second = transport.transmit_raw(&[0x00, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!(second.as_ref(), &[0x6A, 0x83]);
        assert_eq!(transport.commands.len(), 2);
    }

    #[test]
    fn test_mock_transport_disconnected() {
        let mut transport = MockTransport::new(vec![Bytes::from_static(&[0x90, 0x00])]);
        transport.connected = false;
        assert!(matches!(
            transport.transmit_raw(&[0x00, 0x04, 0x00, 0x00]),
            Err(TransportError::Connection)
        ));
    }
}
