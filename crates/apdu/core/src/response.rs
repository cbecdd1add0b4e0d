//! APDU response definitions
//!
//! A response is an optional payload followed by a two byte status word.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::status::StatusWord;

/// Error for status words in APDU responses
#[derive(Debug, Clone, thiserror::Error)]
#[error("status error {status}: {}", .status.description())]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        self.status
    }
}

/// Error for APDU response processing
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("incomplete response")]
    Incomplete,

    /// Status error
    #[error(transparent)]
    Status(#[from] StatusError),
}

/// Basic APDU response structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data
    payload: Option<Bytes>,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: Option<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload,
            status: status.into(),
        }
    }

    /// Create a success response
    pub const fn success(payload: Option<Bytes>) -> Self {
        Self {
            payload,
            status: StatusWord::new(0x90, 0x00),
        }
    }

    /// Create an error response from a status word
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self {
            payload: None,
            status: status.into(),
        }
    }

    /// Get the response payload data
    pub const fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the response indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResponseError> {
        if data.len() < 2 {
            return Err(ResponseError::Incomplete);
        }

        let (payload, sw) = data.split_at(data.len() - 2);
        let status = StatusWord::new(sw[0], sw[1]);
        let payload = if payload.is_empty() {
            None
        } else {
            Some(Bytes::copy_from_slice(payload))
        };

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.as_ref().map_or(0, |p| p.len()),
            "Parsed APDU response"
        );

        Ok(Self { payload, status })
    }

    /// Convert to a bytes result, surfacing non-success status words
    pub fn into_payload(self) -> Result<Option<Bytes>, StatusError> {
        if self.is_success() {
            Ok(self.payload)
        } else {
            Err(StatusError::new(self.status.sw1, self.status.sw2))
        }
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = ResponseError;

    fn try_from(data: &[u8]) -> Result<Self, ResponseError> {
        Self::from_bytes(data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut buf = BytesMut::with_capacity(response.payload.as_ref().map_or(0, |p| p.len()) + 2);
        if let Some(payload) = response.payload {
            buf.put_slice(&payload);
        }
        buf.put_u8(response.status.sw1);
        buf.put_u8(response.status.sw2);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_creation() {
        let data = Some(Bytes::from_static(&[0x01, 0x02, 0x03]));
        let resp = Response::new(data, (0x90, 0x00));
        assert_eq!(
            resp.payload(),
            Some(&Bytes::from_static(&[0x01, 0x02, 0x03]))
        );
        assert!(resp.is_success());
    }

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
        assert_eq!(resp.payload().unwrap().as_ref(), &[0x01, 0x02, 0x03]);
        assert!(resp.is_success());

        let resp = Response::from_bytes(&[0x90, 0x00]).unwrap();
        assert!(resp.payload().is_none());
        assert!(resp.is_success());

        assert!(Response::from_bytes(&[0x01]).is_err());
    }

    #[test]
    fn test_response_into_payload() {
        let success = Response::success(Some(Bytes::from_static(&[0x01, 0x02])));
        assert_eq!(
            success.into_payload().unwrap(),
            Some(Bytes::from_static(&[0x01, 0x02]))
        );

        let error = Response::error((0x6A, 0x83));
        let err = error.into_payload().unwrap_err();
        assert_eq!(err.status.to_u16(), 0x6A83);
    }

    #[test]
    fn test_response_to_bytes() {
        let resp = Response::success(Some(Bytes::from_static(&[0xAA])));
        let bytes: Bytes = resp.into();
        assert_eq!(bytes.as_ref(), &[0xAA, 0x90, 0x00]);

        let resp = Response::error((0x6D, 0x00));
        let bytes: Bytes = resp.into();
        assert_eq!(bytes.as_ref(), &[0x6D, 0x00]);
    }
}
