//! Error types for the credential protocol
//!
//! Transport, status-word and framing failures are kept distinct from
//! protocol outcomes: a rejected proof is a [`Error::VerificationFailed`],
//! never a channel error, and callers can branch on the variants.

use gatecard_apdu_core::response::{ResponseError, StatusError};
use gatecard_apdu_core::transport::TransportError;
use gatecard_pairing::CurveError;

use crate::codec::FramingError;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for protocol operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Channel-level failure; the transport has invalidated its handle
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The card answered with a non-success status word
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The response frame itself was malformed
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// A length-prefixed field was truncated or overran its buffer
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// Curve-level failure (bad point encoding, invalid domain)
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// The requested attribute id is not in the terminal catalogue
    #[error("unknown attribute id {0}")]
    UnknownAttribute(u8),

    /// The requested attribute id is not in the card store
    #[error("attribute not present on card")]
    NotFound,

    /// Mismatched array lengths on personalise, or malformed card input
    #[error("malformed personalisation input")]
    MalformedInput,

    /// The card has not been initialised with a curve domain yet
    #[error("card not initialised")]
    NotInitialised,

    /// The terminal has not personalised the card yet
    #[error("card not personalised")]
    NotPersonalised,

    /// No deterministic setup vectors exist for this key length
    #[error("no deterministic setup vectors for {0}-bit keys")]
    NoDeterministicVectors(u16),

    /// Both sign branches of a verification check failed
    #[error("proof verification failed: {0}")]
    VerificationFailed(&'static str),
}
