//! The card contract
//!
//! Both the in-process card engine and the transport-backed proxy satisfy
//! this trait; the terminal engine is generic over it and never talks to
//! a channel directly.

use num_bigint::BigUint;

use gatecard_pairing::{CurveDomain, CurvePoint};

use crate::Result;
use crate::types::AttributeProof;

/// Operations a credential card supports
///
/// Calls are strictly sequential; no operation is safe to interleave with
/// another on the same instance.
pub trait AttributeCard {
    /// Adopt the curve domain and generate a fresh session keypair
    ///
    /// Returns the card public key `P_c = d_c · g`. Attributes stored
    /// under an earlier keypair stop verifying, although the store is only
    /// physically replaced by the next [`Self::personalise`].
    fn initialise(&mut self, domain: &CurveDomain) -> Result<CurvePoint>;

    /// Replace the attribute store wholesale
    ///
    /// The three slices must have equal lengths; a mismatch is rejected
    /// with [`crate::Error::MalformedInput`] before any state changes.
    fn personalise(
        &mut self,
        ids: &[u8],
        values: &[BigUint],
        certificates: &[CurvePoint],
    ) -> Result<()>;

    /// Produce a freshly blinded proof for the attribute with this id
    ///
    /// Returns [`crate::Error::NotFound`] when the id is not in the store.
    /// Every call samples a new blinding factor; proofs are unlinkable
    /// across calls.
    fn get_attribute(&mut self, id: u8, nonce: &CurvePoint) -> Result<AttributeProof>;

    /// Re-fetch the card public key of the current session
    fn get_key(&mut self) -> Result<CurvePoint>;
}
