//! Protocol data types

use num_bigint::BigUint;

use gatecard_pairing::TwistPoint;

/// A terminal-catalogue attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute identifier, unique within the catalogue
    pub id: u8,
    /// Attribute value
    pub value: BigUint,
}

/// A per-attribute signing keypair
///
/// The private scalar never leaves the terminal; the public point is
/// `sa · Q` on the twisted curve.
#[derive(Debug, Clone)]
pub struct AttributeKeyPair {
    pub(crate) private: BigUint,
    /// Public key `sa · Q`
    pub public: TwistPoint,
}

impl AttributeKeyPair {
    /// Construct a keypair from its private scalar and public point
    pub(crate) const fn new(private: BigUint, public: TwistPoint) -> Self {
        Self { private, public }
    }
}

/// The blinded proof triple a card returns for one attribute
///
/// The three proof quantities are x-coordinates only; the verifier
/// reconstructs the full points, branching over the sign ambiguity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeProof {
    /// x-coordinate of `b · d_c · nonce`
    pub signed_nonce: BigUint,
    /// x-coordinate of `b · P_c`
    pub blinded_key: BigUint,
    /// x-coordinate of `b · cert`
    pub blinded_signature: BigUint,
    /// The plaintext attribute value
    pub value: BigUint,
}
