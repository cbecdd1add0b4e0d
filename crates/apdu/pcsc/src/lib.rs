//! PC/SC transport for the gatecard stack
//!
//! This crate owns the physical channel to a card reader. Connection
//! establishment polls for a present card under an explicit, bounded retry
//! policy and selects the target application before the channel is handed
//! to higher layers. A failed transmission invalidates the cached channel
//! handle, so the next call reconnects transparently.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod transport;

pub use config::PcscConfig;
pub use error::PcscError;
pub use transport::PcscTransport;
