//! Privacy-preserving attribute credentials between a terminal and a card
//!
//! A terminal personalises a card with signed attributes; later, the card
//! proves possession of a chosen attribute's valid signature without
//! revealing its private key or the unblinded signature. The card applies
//! one fresh blinding scalar uniformly to its public key, the stored
//! certificate and a terminal-supplied nonce, which preserves the
//! bilinear pairing identity the terminal checks while making proofs
//! unlinkable.
//!
//! ## Layers
//!
//! - [`Terminal`] drives the protocol against anything implementing the
//!   [`AttributeCard`] contract
//! - [`SoftCard`] is the in-process card engine; [`CardProxy`] reaches a
//!   real card over a [`gatecard_apdu_core::CardTransport`]
//! - [`CardDispatcher`] serves the instruction set card-side and doubles
//!   as a loopback transport
//! - [`codec`] and [`commands`] carry the wire encoding
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod card;
pub mod codec;
pub mod commands;
pub mod constants;
pub mod dispatch;
mod error;
pub mod proxy;
pub mod soft_card;
pub mod terminal;
pub mod types;

pub use card::AttributeCard;
pub use dispatch::CardDispatcher;
pub use error::{Error, Result};
pub use proxy::CardProxy;
pub use soft_card::SoftCard;
pub use terminal::{KeySource, Terminal, TerminalConfig};
pub use types::{Attribute, AttributeKeyPair, AttributeProof};

pub use constants::GATECARD_AID;

// Re-exported so callers can configure a session without depending on
// the pairing crate directly.
pub use gatecard_pairing::KeyLength;
