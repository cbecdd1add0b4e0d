//! Card-side frame dispatch
//!
//! [`CardDispatcher`] serves the protocol instruction set over any
//! [`AttributeCard`] implementation, mirroring what the on-card applet
//! does: parse the frame, run the operation, answer with a status word.
//! It also implements [`CardTransport`], which turns it into a loopback
//! channel for exercising the full wire stack in-process.

use std::fmt;

use bytes::Bytes;
use tracing::trace;

use gatecard_apdu_core::prelude::*;
use gatecard_apdu_core::status::common;
use gatecard_pairing::{CurveDomain, WeierstrassCurve};

use crate::card::AttributeCard;
use crate::codec::{put_bytes, put_uint, read_field, read_uint};
use crate::constants::{GATECARD_AID, cla, ins};
use crate::{Error, Result};

/// Serves protocol frames against a card implementation
#[derive(Debug)]
pub struct CardDispatcher<C: AttributeCard> {
    card: C,
    aid: Vec<u8>,
    curve: Option<WeierstrassCurve>,
}

impl<C: AttributeCard> CardDispatcher<C> {
    /// Wrap a card, answering for the default applet AID
    pub fn new(card: C) -> Self {
        Self::with_aid(card, GATECARD_AID)
    }

    /// Wrap a card with a custom AID
    pub fn with_aid(card: C, aid: impl Into<Vec<u8>>) -> Self {
        Self {
            card,
            aid: aid.into(),
            curve: None,
        }
    }

    /// Access the wrapped card
    pub const fn card_mut(&mut self) -> &mut C {
        &mut self.card
    }

    /// Unwrap into the card
    pub fn into_card(self) -> C {
        self.card
    }

    /// Handle one command frame and produce the response frame
    pub fn handle(&mut self, frame: &[u8]) -> Response {
        let command = match Command::from_bytes(frame) {
            Ok(command) => command,
            Err(_) => return Response::error(common::WRONG_LENGTH),
        };
        if command.cla != cla::ISO7816 {
            return Response::error(common::CLASS_NOT_SUPPORTED);
        }

        let data = command.data.as_deref().unwrap_or_default();
        trace!(ins = command.ins, len = data.len(), "Dispatching frame");

        match command.ins {
            ins::SELECT => {
                if data == self.aid {
                    Response::success(None)
                } else {
                    Response::error(common::FILE_NOT_FOUND)
                }
            }
            ins::INITIALISE => respond(self.initialise(data)),
            ins::PERSONALISE => respond(self.personalise(data)),
            ins::GET_ATTRIBUTE => respond(self.get_attribute(data)),
            ins::GET_KEY => respond(self.get_key()),
            _ => Response::error(common::INVALID_INSTRUCTION),
        }
    }

    fn initialise(&mut self, data: &[u8]) -> Result<Option<Bytes>> {
        let (p, offset) = read_uint(data, 0)?;
        let (order, offset) = read_uint(data, offset)?;
        let (a, offset) = read_uint(data, offset)?;
        let (b, offset) = read_uint(data, offset)?;
        let (encoded_generator, _) = read_field(data, offset)?;

        let curve = WeierstrassCurve::new(p, a, b);
        let generator = curve.decode_point(encoded_generator)?;
        let domain = CurveDomain {
            curve,
            generator,
            order,
        };

        let key = self.card.initialise(&domain)?;

        let mut payload = bytes::BytesMut::new();
        put_bytes(&mut payload, &domain.curve.encode_point(&key));
        self.curve = Some(domain.curve);
        Ok(Some(payload.freeze()))
    }

    fn personalise(&mut self, data: &[u8]) -> Result<Option<Bytes>> {
        let curve = self.curve.as_ref().ok_or(Error::NotInitialised)?;

        if data.len() < 2 {
            return Err(Error::MalformedInput);
        }
        let count = usize::from(u16::from_be_bytes([data[0], data[1]]));

        let mut ids = Vec::with_capacity(count);
        let mut values = Vec::with_capacity(count);
        let mut certificates = Vec::with_capacity(count);

        let mut offset = 2;
        for _ in 0..count {
            let id = *data.get(offset).ok_or(Error::MalformedInput)?;
            let (encoded_certificate, next) = read_field(data, offset + 1)?;
            let (value, next) = read_uint(data, next)?;

            ids.push(id);
            certificates.push(curve.decode_point(encoded_certificate)?);
            values.push(value);
            offset = next;
        }
        if offset != data.len() {
            return Err(Error::MalformedInput);
        }

        self.card.personalise(&ids, &values, &certificates)?;
        Ok(None)
    }

    fn get_attribute(&mut self, data: &[u8]) -> Result<Option<Bytes>> {
        let curve = self.curve.as_ref().ok_or(Error::NotInitialised)?;

        let id = *data.first().ok_or(Error::MalformedInput)?;
        let (encoded_nonce, _) = read_field(data, 1)?;
        let nonce = curve.decode_point(encoded_nonce)?;

        let proof = self.card.get_attribute(id, &nonce)?;

        let mut payload = bytes::BytesMut::new();
        put_uint(&mut payload, &proof.signed_nonce);
        put_uint(&mut payload, &proof.blinded_key);
        put_uint(&mut payload, &proof.blinded_signature);
        put_uint(&mut payload, &proof.value);
        Ok(Some(payload.freeze()))
    }

    fn get_key(&mut self) -> Result<Option<Bytes>> {
        let key = self.card.get_key()?;
        let curve = self.curve.as_ref().ok_or(Error::NotInitialised)?;

        let mut payload = bytes::BytesMut::new();
        put_bytes(&mut payload, &curve.encode_point(&key));
        Ok(Some(payload.freeze()))
    }
}

/// Map an operation outcome onto a response frame
fn respond(result: Result<Option<Bytes>>) -> Response {
    match result {
        Ok(payload) => Response::success(payload),
        Err(error) => Response::error(status_for(&error)),
    }
}

/// The status word a card answers with for each failure
fn status_for(error: &Error) -> StatusWord {
    match error {
        Error::NotFound => common::RECORD_NOT_FOUND,
        Error::MalformedInput | Error::Framing(_) | Error::Curve(_) => common::INCORRECT_DATA,
        Error::NotInitialised => common::CONDITIONS_NOT_SATISFIED,
        _ => StatusWord::new(0x6F, 0x00),
    }
}

impl<C: AttributeCard + Send + fmt::Debug> CardTransport for CardDispatcher<C> {
    fn do_transmit_raw(&mut self, command: &[u8]) -> std::result::Result<Bytes, TransportError> {
        Ok(self.handle(command).into())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn reset(&mut self) -> std::result::Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands;
    use crate::soft_card::SoftCard;
    use gatecard_pairing::{BnCurve, KeyLength};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dispatcher() -> CardDispatcher<SoftCard> {
        CardDispatcher::new(SoftCard::with_rng(StdRng::seed_from_u64(11)))
    }

    #[test]
    fn test_select_by_aid() {
        let mut dispatcher = dispatcher();
        let frame = commands::select::command(GATECARD_AID).to_bytes();
        assert!(dispatcher.handle(&frame).is_success());

        let frame = commands::select::command([0x01, 0x02]).to_bytes();
        assert_eq!(
            dispatcher.handle(&frame).status(),
            common::FILE_NOT_FOUND
        );
    }

    #[test]
    fn test_unknown_instruction_and_class() {
        let mut dispatcher = dispatcher();
        let response = dispatcher.handle(&[0x00, 0x99, 0x00, 0x00]);
        assert_eq!(response.status(), common::INVALID_INSTRUCTION);

        let response = dispatcher.handle(&[0x80, 0x01, 0x00, 0x00]);
        assert_eq!(response.status(), common::CLASS_NOT_SUPPORTED);

        let response = dispatcher.handle(&[0x00]);
        assert_eq!(response.status(), common::WRONG_LENGTH);
    }

    #[test]
    fn test_initialise_round_trip() {
        let mut dispatcher = dispatcher();
        let curve = BnCurve::new(KeyLength::Bits128);
        let frame = commands::initialise::command(&curve.domain()).to_bytes();

        let response = dispatcher.handle(&frame);
        assert!(response.is_success());
        let key = commands::initialise::parse_payload(
            curve.base(),
            response.payload().unwrap(),
        )
        .unwrap();
        assert!(curve.base().contains(&key));
    }

    #[test]
    fn test_operations_before_initialise_are_rejected() {
        let mut dispatcher = dispatcher();
        let frame = commands::get_key::command().to_bytes();
        assert_eq!(
            dispatcher.handle(&frame).status(),
            common::CONDITIONS_NOT_SATISFIED
        );
    }

    #[test]
    fn test_truncated_initialise_is_rejected() {
        let mut dispatcher = dispatcher();
        let curve = BnCurve::new(KeyLength::Bits128);
        let frame = commands::initialise::command(&curve.domain());
        let mut raw = frame.to_bytes().to_vec();
        // Truncate the data field while fixing up Lc so the APDU parses
        let lc = raw[4] as usize;
        raw.truncate(4 + 1 + lc / 2);
        raw[4] = (lc / 2) as u8;

        assert_eq!(dispatcher.handle(&raw).status(), common::INCORRECT_DATA);
    }
}
