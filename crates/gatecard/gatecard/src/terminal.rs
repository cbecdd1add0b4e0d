//! Terminal protocol engine
//!
//! The verifier/personaliser side: owns the pairing curve, the fixed
//! twist point, the attribute catalogue and the per-attribute signing
//! keys, and drives a card through the [`AttributeCard`] contract. It
//! never touches the channel directly.

use std::time::Instant;

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use gatecard_pairing::{BnCurve, CurvePoint, KeyLength, TwistPoint};

use crate::card::AttributeCard;
use crate::types::{Attribute, AttributeKeyPair, AttributeProof};
use crate::{Error, Result};

/// Where the session's fixed point and attribute keys come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Published test vectors (128/160/192-bit only) and the fixed
    /// four-attribute catalogue
    Deterministic,
    /// Freshly sampled fixed point, keys and attribute values
    Randomised {
        /// Number of catalogue attributes to generate
        attribute_count: usize,
    },
}

/// Terminal session configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Curve key length
    pub key_length: KeyLength,
    /// Key and catalogue source
    pub key_source: KeySource,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            key_length: KeyLength::Bits128,
            key_source: KeySource::Deterministic,
        }
    }
}

impl TerminalConfig {
    /// Set the key length
    pub const fn with_key_length(mut self, key_length: KeyLength) -> Self {
        self.key_length = key_length;
        self
    }

    /// Use randomised keys and catalogue
    pub const fn randomised(mut self, attribute_count: usize) -> Self {
        self.key_source = KeySource::Randomised { attribute_count };
        self
    }
}

/// Session progress; personalisation must precede proving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TerminalState {
    Uninitialised,
    Personalised,
    Proving,
}

/// The terminal protocol engine
///
/// Generic over the card implementation: a [`crate::SoftCard`] for
/// simulation or a [`crate::CardProxy`] over a real channel, chosen at
/// construction time.
#[derive(Debug)]
pub struct Terminal<C: AttributeCard> {
    curve: BnCurve,
    fixed_point: TwistPoint,
    catalogue: Vec<Attribute>,
    keys: Vec<AttributeKeyPair>,
    card: C,
    rng: StdRng,
    state: TerminalState,
}

impl<C: AttributeCard> Terminal<C> {
    /// Create a terminal session with an entropy-seeded RNG
    pub fn new(config: TerminalConfig, card: C) -> Result<Self> {
        Self::with_rng(config, card, StdRng::from_entropy())
    }

    /// Create a terminal session with the given RNG
    pub fn with_rng(config: TerminalConfig, card: C, mut rng: StdRng) -> Result<Self> {
        let curve = BnCurve::new(config.key_length);

        let (fixed_point, catalogue, private_keys) = match config.key_source {
            KeySource::Deterministic => {
                let vectors = fixed_attribute_key_vectors(config.key_length)
                    .ok_or(Error::NoDeterministicVectors(config.key_length.bits()))?;
                let fixed_point = curve.fixed_twist_point()?;
                let private_keys = vectors
                    .iter()
                    .map(|s| BigUint::parse_bytes(s.as_bytes(), 10).unwrap_or_default())
                    .collect::<Vec<_>>();
                (fixed_point, fixed_catalogue(), private_keys)
            }
            KeySource::Randomised { attribute_count } => {
                let fixed_point = curve.random_twist_point(&mut rng);
                let catalogue = (0..attribute_count)
                    .map(|i| Attribute {
                        id: (i + 1) as u8,
                        value: rng.gen_biguint(128),
                    })
                    .collect();
                let private_keys = (0..attribute_count)
                    .map(|_| sample_scalar(&mut rng, curve.order()))
                    .collect();
                (fixed_point, catalogue, private_keys)
            }
        };

        let keys = private_keys
            .into_iter()
            .map(|private| {
                let public = curve.twist_mul(&private, &fixed_point);
                AttributeKeyPair::new(private, public)
            })
            .collect();

        Ok(Self {
            curve,
            fixed_point,
            catalogue,
            keys,
            card,
            rng,
            state: TerminalState::Uninitialised,
        })
    }

    /// The attribute catalogue of this session
    pub fn attributes(&self) -> &[Attribute] {
        &self.catalogue
    }

    /// Access the card implementation
    pub const fn card_mut(&mut self) -> &mut C {
        &mut self.card
    }

    /// Initialise the card and install the selected attributes
    ///
    /// Re-invoking re-issues all credentials under a fresh card keypair,
    /// which invalidates everything issued before. An id missing from the
    /// catalogue aborts before the card is contacted a second time.
    pub fn personalise(&mut self, ids: &[u8]) -> Result<()> {
        info!(
            key_length = self.curve.key_length().bits(),
            count = ids.len(),
            "Personalising card"
        );

        let card_key = self.card.initialise(&self.curve.domain())?;

        // Certificates over the whole catalogue, bound to this card key
        let certificates: Vec<CurvePoint> = self
            .keys
            .iter()
            .map(|key| self.curve.base().mul(&key.private, &card_key))
            .collect();

        // Select the requested subset
        let mut values = Vec::with_capacity(ids.len());
        let mut selected = Vec::with_capacity(ids.len());
        for &id in ids {
            let index = self
                .catalogue
                .iter()
                .position(|attribute| attribute.id == id)
                .ok_or(Error::UnknownAttribute(id))?;
            values.push(self.catalogue[index].value.clone());
            selected.push(certificates[index].clone());
        }

        self.card.personalise(ids, &values, &selected)?;
        self.state = TerminalState::Personalised;
        Ok(())
    }

    /// Request and verify a proof for the catalogue attribute at `index`
    ///
    /// On success returns the attribute value reported by the card; what
    /// to do with it (e.g. granting access) is the caller's policy.
    pub fn prove_attribute(&mut self, index: usize) -> Result<BigUint> {
        if self.state == TerminalState::Uninitialised {
            return Err(Error::NotPersonalised);
        }
        let id = self
            .catalogue
            .get(index)
            .ok_or(Error::UnknownAttribute(index as u8))?
            .id;

        let nonce_scalar = sample_scalar(&mut self.rng, self.curve.order());
        let nonce = self
            .curve
            .base()
            .mul(&nonce_scalar, self.curve.generator());

        let proof = self.card.get_attribute(id, &nonce)?;

        let start = Instant::now();
        self.verify_proof(index, &nonce_scalar, &proof)?;
        debug!(
            id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Proof verified"
        );

        self.state = TerminalState::Proving;
        Ok(proof.value)
    }

    /// Verify a proof triple against this session's keys
    ///
    /// The wire carries x-coordinates only, so each reconstruction yields
    /// a candidate pair; a check passes when any candidate satisfies it.
    fn verify_proof(
        &self,
        index: usize,
        nonce_scalar: &BigUint,
        proof: &AttributeProof,
    ) -> Result<()> {
        let base = self.curve.base();

        let signed_nonce_candidates = base
            .lift_x(&proof.signed_nonce)
            .ok_or(Error::VerificationFailed("signed nonce is not on the curve"))?;
        let [blinded_key, _] = base
            .lift_x(&proof.blinded_key)
            .ok_or(Error::VerificationFailed("blinded key is not on the curve"))?;
        let [blinded_signature, _] = base.lift_x(&proof.blinded_signature).ok_or(
            Error::VerificationFailed("blinded signature is not on the curve"),
        )?;

        // Nonce check: the card must have multiplied our nonce by its
        // private scalar and blinded it like the key.
        let expected = base.mul(nonce_scalar, &blinded_key);
        if !signed_nonce_candidates.contains(&expected) {
            warn!("Nonce signature verification failed for both sign branches");
            return Err(Error::VerificationFailed("nonce check"));
        }

        // Pairing check: e(b·P_c, sa·Q) must equal e(b·cert, Q). A sign
        // flip from reconstruction inverts one side, so the product
        // equalling one is accepted as well.
        let e1 = self.curve.pairing(&blinded_key, &self.keys[index].public);
        let e2 = self.curve.pairing(&blinded_signature, &self.fixed_point);
        if e1 != e2 && !e1.mul(&e2, self.curve.modulus()).is_one() {
            warn!("Pairing signature verification failed for both branches");
            return Err(Error::VerificationFailed("pairing check"));
        }

        Ok(())
    }
}

fn sample_scalar(rng: &mut StdRng, order: &BigUint) -> BigUint {
    loop {
        let scalar = rng.gen_biguint_below(order);
        if !scalar.is_zero() {
            return scalar;
        }
    }
}

/// The default catalogue used by the deterministic setup
fn fixed_catalogue() -> Vec<Attribute> {
    [
        (1u8, 100_001u32),
        (2, 200_002),
        (3, 300_003),
        (4, 400_004),
    ]
    .into_iter()
    .map(|(id, value)| Attribute {
        id,
        value: BigUint::from(value),
    })
    .collect()
}

/// Fixed private attribute keys for the deterministic setup, as decimal
/// strings. The 224-bit instance has no published vectors.
const fn fixed_attribute_key_vectors(length: KeyLength) -> Option<[&'static str; 4]> {
    match length {
        KeyLength::Bits128 => Some([
            "225372274231985790200027551690655815158",
            "245101174517207170638066748358856317475",
            "151090931996779535702545347407601272920",
            "136791876731881043202558472946915414935",
        ]),
        KeyLength::Bits160 => Some([
            "330901983855736385735122296827923334307263610761",
            "186811774159849458934010617336619260142261775654",
            "200301894953491984814918734560179597654129668224",
            "750491186790593356184026972752047947855576453650",
        ]),
        KeyLength::Bits192 => Some([
            "3593628016221464844523691788059997682516891660955827077913",
            "4464361787165100929465907257058278398048745164767155554885",
            "2968611473043184454125366431770946774998904765828172704480",
            "2662731123551621877786553098979283273055334939330269203348",
        ]),
        KeyLength::Bits224 => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soft_card::SoftCard;
    use num_traits::One;

    fn terminal() -> Terminal<SoftCard> {
        Terminal::with_rng(
            TerminalConfig::default(),
            SoftCard::with_rng(StdRng::seed_from_u64(21)),
            StdRng::seed_from_u64(22),
        )
        .unwrap()
    }

    #[test]
    fn test_deterministic_setup_has_four_attributes() {
        let terminal = terminal();
        assert_eq!(terminal.attributes().len(), 4);
        assert_eq!(terminal.attributes()[0].id, 1);
        assert_eq!(terminal.attributes()[0].value, BigUint::from(100_001u32));
    }

    #[test]
    fn test_deterministic_setup_rejected_for_224() {
        let config = TerminalConfig::default().with_key_length(KeyLength::Bits224);
        let result = Terminal::with_rng(
            config,
            SoftCard::with_rng(StdRng::seed_from_u64(1)),
            StdRng::seed_from_u64(2),
        );
        assert!(matches!(result, Err(Error::NoDeterministicVectors(224))));
    }

    #[test]
    fn test_prove_requires_personalisation() {
        let mut terminal = terminal();
        assert!(matches!(
            terminal.prove_attribute(0),
            Err(Error::NotPersonalised)
        ));
    }

    #[test]
    fn test_personalise_rejects_unknown_id() {
        let mut terminal = terminal();
        assert!(matches!(
            terminal.personalise(&[9]),
            Err(Error::UnknownAttribute(9))
        ));
    }

    #[test]
    fn test_nonce_binding() {
        let mut terminal = terminal();
        terminal.personalise(&[1]).unwrap();

        let scalar = BigUint::from(0x1234_5678u64);
        let nonce = terminal
            .curve
            .base()
            .mul(&scalar, terminal.curve.generator());
        let proof = terminal.card.get_attribute(1, &nonce).unwrap();

        assert!(terminal.verify_proof(0, &scalar, &proof).is_ok());

        // The same proof must fail against any other nonce scalar
        let other = BigUint::from(0x8765_4321u64);
        assert!(matches!(
            terminal.verify_proof(0, &other, &proof),
            Err(Error::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let mut terminal = terminal();
        terminal.personalise(&[1]).unwrap();

        let scalar = BigUint::from(0xdef0_1234u64);
        let nonce = terminal
            .curve
            .base()
            .mul(&scalar, terminal.curve.generator());
        let mut proof = terminal.card.get_attribute(1, &nonce).unwrap();
        proof.blinded_signature ^= BigUint::one();

        assert!(matches!(
            terminal.verify_proof(0, &scalar, &proof),
            Err(Error::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_proofs_are_unlinkable() {
        let mut terminal = terminal();
        terminal.personalise(&[1]).unwrap();

        let scalar = BigUint::from(0x2468_ace0u64);
        let nonce = terminal
            .curve
            .base()
            .mul(&scalar, terminal.curve.generator());

        let first = terminal.card.get_attribute(1, &nonce).unwrap();
        let second = terminal.card.get_attribute(1, &nonce).unwrap();

        // Fresh blinding per call: different proof values, both valid
        assert_ne!(first.blinded_key, second.blinded_key);
        assert!(terminal.verify_proof(0, &scalar, &first).is_ok());
        assert!(terminal.verify_proof(0, &scalar, &second).is_ok());
    }

    #[test]
    fn test_reinitialise_invalidates_certificates() {
        let mut terminal = terminal();
        terminal.personalise(&[1]).unwrap();
        assert!(terminal.prove_attribute(0).is_ok());

        // A fresh card keypair makes the stored certificates stale even
        // though the store still lists the attribute.
        let domain = terminal.curve.domain();
        terminal.card_mut().initialise(&domain).unwrap();
        assert!(matches!(
            terminal.prove_attribute(0),
            Err(Error::VerificationFailed(_))
        ));
    }
}
