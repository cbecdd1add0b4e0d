//! Transport-backed card implementation
//!
//! [`CardProxy`] translates contract calls into wire frames and parses
//! the responses back. It owns a [`CardTransport`]; channel failures
//! surface as transport errors after the transport has invalidated its
//! handle, and a record-not-found status word maps to the protocol's
//! distinct not-found outcome.

use bytes::Bytes;
use num_bigint::BigUint;
use tracing::debug;

use gatecard_apdu_core::prelude::*;
use gatecard_pairing::{CurveDomain, CurvePoint, WeierstrassCurve};

use crate::card::AttributeCard;
use crate::commands;
use crate::types::AttributeProof;
use crate::{Error, Result};

/// A credential card reached over a transport
#[derive(Debug)]
pub struct CardProxy<T: CardTransport> {
    transport: T,
    /// Base curve of the domain sent at initialise time; needed to encode
    /// and decode points in later calls
    curve: Option<WeierstrassCurve>,
}

impl<T: CardTransport> CardProxy<T> {
    /// Wrap a transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            curve: None,
        }
    }

    /// Access the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Unwrap into the underlying transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn exchange(&mut self, command: &Command) -> Result<Response> {
        let raw = self.transport.transmit_raw(&command.to_bytes())?;
        Ok(Response::from_bytes(&raw)?)
    }

    /// Extract the payload of a successful response
    ///
    /// A record-not-found status word becomes [`Error::NotFound`]; any
    /// other non-success word surfaces with its raw value and the payload
    /// is never parsed.
    fn success_payload(response: Response) -> Result<Bytes> {
        let status = response.status();
        if status.is_record_not_found() {
            return Err(Error::NotFound);
        }
        let payload = response.into_payload()?;
        Ok(payload.unwrap_or_default())
    }

    fn curve(&self) -> Result<&WeierstrassCurve> {
        self.curve.as_ref().ok_or(Error::NotInitialised)
    }
}

impl<T: CardTransport> AttributeCard for CardProxy<T> {
    fn initialise(&mut self, domain: &CurveDomain) -> Result<CurvePoint> {
        debug!("Initialising card");
        let response = self.exchange(&commands::initialise::command(domain))?;
        let payload = Self::success_payload(response)?;
        let key = commands::initialise::parse_payload(&domain.curve, &payload)?;
        self.curve = Some(domain.curve.clone());
        Ok(key)
    }

    fn personalise(
        &mut self,
        ids: &[u8],
        values: &[BigUint],
        certificates: &[CurvePoint],
    ) -> Result<()> {
        // Rejected before any channel I/O
        if ids.len() != values.len() || ids.len() != certificates.len() {
            return Err(Error::MalformedInput);
        }
        debug!(count = ids.len(), "Personalising card");

        let command = commands::personalise::command(self.curve()?, ids, values, certificates);
        let response = self.exchange(&command)?;
        Self::success_payload(response)?;
        Ok(())
    }

    fn get_attribute(&mut self, id: u8, nonce: &CurvePoint) -> Result<AttributeProof> {
        debug!(id, "Requesting attribute proof");
        let command = commands::get_attribute::command(self.curve()?, id, nonce);
        let response = self.exchange(&command)?;
        let payload = Self::success_payload(response)?;
        commands::get_attribute::parse_payload(&payload)
    }

    fn get_key(&mut self) -> Result<CurvePoint> {
        let curve = self.curve()?.clone();
        let response = self.exchange(&commands::get_key::command())?;
        let payload = Self::success_payload(response)?;
        commands::get_key::parse_payload(&curve, &payload)
    }
}
