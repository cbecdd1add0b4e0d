//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;
use std::thread;
use std::time::Instant;

use bytes::Bytes;
use pcsc::{Card, Context, Disposition, Scope};
use tracing::{debug, trace, warn};

use gatecard_apdu_core::prelude::*;

use crate::{config::PcscConfig, error::PcscError};

/// Transport implementation using PC/SC
///
/// The channel handle is `None` until a connection attempt succeeds. Every
/// successful connection has already selected the configured application,
/// so callers can transmit protocol instructions immediately.
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Name of the reader the current connection was made through
    reader_name: Option<String>,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a new PC/SC transport with the given configuration
    ///
    /// Establishing the PC/SC context does not touch any reader; the first
    /// connection is made lazily on the first transmission (or explicitly
    /// via [`Self::connect`]).
    pub fn new(config: PcscConfig) -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self {
            context,
            card: None,
            reader_name: None,
            config,
        })
    }

    /// Get the name of the reader of the active connection, if any
    pub fn reader_name(&self) -> Option<&str> {
        self.reader_name.as_deref()
    }

    /// Check if the transport currently holds a channel handle
    pub const fn has_card(&self) -> bool {
        self.card.is_some()
    }

    /// Establish a connection, polling for a present card
    ///
    /// Each attempt scans the configured reader (or all readers), opens a
    /// channel and selects the target application. Attempts that fail for
    /// any reason discard the handle and are retried after the poll
    /// interval, up to the configured maximum.
    pub fn connect(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let max_attempts = self.config.max_connect_attempts;
        for attempt in 1..=max_attempts {
            match self.try_connect_once() {
                Ok(()) => {
                    debug!(attempt, reader = ?self.reader_name, "Connected to card");
                    return Ok(());
                }
                Err(e) => {
                    trace!(attempt, error = %e, "Connection attempt failed");
                }
            }
            thread::sleep(self.config.poll_interval);
        }

        warn!(max_attempts, "Connection attempts exhausted");
        Err(PcscError::ConnectExhausted(max_attempts))
    }

    /// A single connection attempt across the candidate readers
    fn try_connect_once(&mut self) -> Result<(), PcscError> {
        let readers = self.candidate_readers()?;
        if readers.is_empty() {
            return match &self.config.reader {
                Some(name) => Err(PcscError::ReaderNotFound(name.clone())),
                None => Err(PcscError::NoReadersAvailable),
            };
        }

        let mut last_error = None;
        for reader in readers {
            let name = reader.to_string_lossy().into_owned();
            match self
                .context
                .connect(&reader, self.config.share_mode, self.config.protocols)
            {
                Ok(card) => match self.select_application(&card) {
                    Ok(()) => {
                        self.card = Some(card);
                        self.reader_name = Some(name);
                        return Ok(());
                    }
                    Err(e) => {
                        let _ = card.disconnect(Disposition::LeaveCard);
                        last_error = Some(e);
                    }
                },
                Err(e) => last_error = Some(e.into()),
            }
        }

        Err(last_error.unwrap_or(PcscError::NoReadersAvailable))
    }

    /// List the readers a connection attempt should consider
    fn candidate_readers(&self) -> Result<Vec<CString>, PcscError> {
        let mut buffer = [0u8; 4096];
        let names = self.context.list_readers(&mut buffer)?;

        Ok(names
            .filter(|name| match &self.config.reader {
                Some(wanted) => name.to_string_lossy() == *wanted,
                None => true,
            })
            .map(CString::from)
            .collect())
    }

    /// Transmit the application selection frame over a fresh channel
    fn select_application(&self, card: &Card) -> Result<(), PcscError> {
        if self.config.aid.is_empty() {
            return Ok(());
        }

        let select =
            Command::new_with_data(0x00, 0xA4, 0x04, 0x00, self.config.aid.clone()).with_le(0x00);
        let mut buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        let raw = card.transmit(&select.to_bytes(), &mut buffer)?;

        let response = Response::from_bytes(raw).map_err(|_| PcscError::SelectFailed(0x6F00))?;
        if response.is_success() {
            Ok(())
        } else {
            Err(PcscError::SelectFailed(response.status().to_u16()))
        }
    }

    /// Transmit a command to the card, connecting first if needed
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        self.connect()?;

        let card = match &mut self.card {
            Some(card) => card,
            None => {
                let reader = self.reader_name.clone().unwrap_or_default();
                return Err(PcscError::NoCard(reader));
            }
        };

        let start = Instant::now();
        let mut response_buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        match card.transmit(command, &mut response_buffer) {
            Ok(response) => {
                debug!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Exchange complete"
                );
                Ok(Bytes::copy_from_slice(response))
            }
            Err(e) => {
                // Invalidate the handle so the next call reconnects. The
                // failed call itself is never retried here.
                self.card = None;
                self.reader_name = None;
                Err(e.into())
            }
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::ResetCard);
        }
        self.reader_name = None;
        self.connect().map_err(Into::into)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
