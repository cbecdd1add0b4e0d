//! Error types for the PC/SC transport

use gatecard_apdu_core::transport::TransportError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("no readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("no card present in reader: {0}")]
    NoCard(String),

    /// Application selection rejected by the card
    #[error("application selection failed with status {0:#06X}")]
    SelectFailed(u16),

    /// Connection attempts exhausted
    #[error("gave up connecting after {0} attempts")]
    ConnectExhausted(u32),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(pcsc::Error::NoSmartcard)
            | PcscError::NoCard(_)
            | PcscError::NoReadersAvailable
            | PcscError::ReaderNotFound(_)
            | PcscError::ConnectExhausted(_) => Self::Connection,
            PcscError::SelectFailed(sw) => Self::StatusWord(sw),
            PcscError::Pcsc(e) => Self::Other(format!("PC/SC error: {e}")),
        }
    }
}
