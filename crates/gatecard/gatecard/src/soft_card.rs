//! In-process card engine
//!
//! [`SoftCard`] implements the card side of the protocol directly in
//! memory: the same contract a physical card fulfils over the channel,
//! without any wire encoding. Used for simulation and testing, and as the
//! reference for what the on-card applet must do.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use gatecard_pairing::{CurveDomain, CurvePoint};

use crate::card::AttributeCard;
use crate::types::AttributeProof;
use crate::{Error, Result};

/// One personalised attribute in the card store
#[derive(Debug, Clone)]
struct StoredAttribute {
    id: u8,
    value: BigUint,
    certificate: CurvePoint,
}

/// The per-session cryptographic state adopted at initialise time
#[derive(Debug)]
struct SessionKeys {
    domain: CurveDomain,
    private_key: BigUint,
    public_key: CurvePoint,
}

/// A simulated credential card
///
/// Holds the curve domain received at initialise time, the session
/// keypair and the personalised store. The store survives a re-initialise
/// (the old certificates simply stop verifying against the new key) and
/// is replaced wholesale by the next personalise.
#[derive(Debug)]
pub struct SoftCard {
    rng: StdRng,
    session: Option<SessionKeys>,
    store: Vec<StoredAttribute>,
}

impl SoftCard {
    /// Create a card with an entropy-seeded RNG
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a card with the given RNG (deterministic in tests)
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            session: None,
            store: Vec::new(),
        }
    }

    /// Sample a scalar in `[1, r)`
    fn sample_scalar(rng: &mut StdRng, order: &BigUint) -> BigUint {
        loop {
            let scalar = rng.gen_biguint_below(order);
            if !scalar.is_zero() {
                return scalar;
            }
        }
    }
}

impl Default for SoftCard {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeCard for SoftCard {
    fn initialise(&mut self, domain: &CurveDomain) -> Result<CurvePoint> {
        domain.validate()?;

        let private_key = Self::sample_scalar(&mut self.rng, &domain.order);
        let public_key = domain.curve.mul(&private_key, &domain.generator);
        debug!("Card initialised with fresh keypair");

        self.session = Some(SessionKeys {
            domain: domain.clone(),
            private_key,
            public_key: public_key.clone(),
        });

        Ok(public_key)
    }

    fn personalise(
        &mut self,
        ids: &[u8],
        values: &[BigUint],
        certificates: &[CurvePoint],
    ) -> Result<()> {
        if self.session.is_none() {
            return Err(Error::NotInitialised);
        }
        if ids.len() != values.len() || ids.len() != certificates.len() {
            return Err(Error::MalformedInput);
        }

        self.store = ids
            .iter()
            .zip(values)
            .zip(certificates)
            .map(|((&id, value), certificate)| StoredAttribute {
                id,
                value: value.clone(),
                certificate: certificate.clone(),
            })
            .collect();

        debug!(count = self.store.len(), "Card store replaced");
        Ok(())
    }

    fn get_attribute(&mut self, id: u8, nonce: &CurvePoint) -> Result<AttributeProof> {
        let session = self.session.as_ref().ok_or(Error::NotInitialised)?;
        let curve = &session.domain.curve;

        let nonce = reduced(nonce, curve.prime());
        if nonce.is_infinity() || !curve.contains(&nonce) {
            return Err(Error::MalformedInput);
        }

        let entry = self
            .store
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(Error::NotFound)?;

        // Fresh blinding factor, applied uniformly to all three proof
        // quantities and dropped on return.
        let blinder = Self::sample_scalar(&mut self.rng, &session.domain.order);
        trace!(id, "Producing blinded attribute proof");

        // The store may predate the current domain (a re-initialise keeps
        // it); reduce the certificate into the current field. Such stale
        // entries produce proofs that fail verification.
        let certificate = reduced(&entry.certificate, curve.prime());

        let blinded_key = curve.mul(&blinder, &session.public_key);
        let blinded_signature = curve.mul(&blinder, &certificate);
        let signed_nonce = curve.mul(&blinder, &curve.mul(&session.private_key, &nonce));

        Ok(AttributeProof {
            signed_nonce: affine_x(&signed_nonce)?,
            blinded_key: affine_x(&blinded_key)?,
            blinded_signature: affine_x(&blinded_signature)?,
            value: entry.value.clone(),
        })
    }

    fn get_key(&mut self) -> Result<CurvePoint> {
        self.session
            .as_ref()
            .map(|session| session.public_key.clone())
            .ok_or(Error::NotInitialised)
    }
}

/// The x-coordinate of an affine point
///
/// The proof quantities have order `r`, so infinity only arises from
/// degenerate inputs (an infinity certificate); reject those.
fn affine_x(point: &CurvePoint) -> Result<BigUint> {
    point.x().cloned().ok_or(Error::MalformedInput)
}

/// A copy of the point with coordinates reduced modulo `p`
fn reduced(point: &CurvePoint, p: &BigUint) -> CurvePoint {
    match point {
        CurvePoint::Infinity => CurvePoint::Infinity,
        CurvePoint::Affine { x, y } => CurvePoint::Affine { x: x % p, y: y % p },
    }
}
