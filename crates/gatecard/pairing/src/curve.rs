//! Short-Weierstrass curves over a prime field
//!
//! The card side of the protocol treats the curve generically: the domain
//! parameters arrive over the wire and are adopted as-is (after checking
//! the generator). Arithmetic is affine with Fermat inversion; the moduli
//! are prime by construction.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::CurveError;
use crate::fp::{add_mod, inv_mod, mul_mod, neg_mod, sqrt_mod, sub_mod};

/// A point on a [`WeierstrassCurve`], in affine coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurvePoint {
    /// The point at infinity
    Infinity,
    /// An affine point
    Affine {
        /// x-coordinate
        x: BigUint,
        /// y-coordinate
        y: BigUint,
    },
}

impl CurvePoint {
    /// Construct an affine point
    pub const fn new(x: BigUint, y: BigUint) -> Self {
        Self::Affine { x, y }
    }

    /// Whether this is the point at infinity
    pub const fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// The x-coordinate, if the point is affine
    pub const fn x(&self) -> Option<&BigUint> {
        match self {
            Self::Infinity => None,
            Self::Affine { x, .. } => Some(x),
        }
    }

    /// The y-coordinate, if the point is affine
    pub const fn y(&self) -> Option<&BigUint> {
        match self {
            Self::Infinity => None,
            Self::Affine { y, .. } => Some(y),
        }
    }
}

/// An elliptic curve `y² ≡ x³ + ax + b` over the prime field `F_p`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeierstrassCurve {
    prime: BigUint,
    coefficient_a: BigUint,
    coefficient_b: BigUint,
}

impl WeierstrassCurve {
    /// Construct a curve from its parameters (reduced modulo `p`)
    pub fn new(prime: BigUint, coefficient_a: BigUint, coefficient_b: BigUint) -> Self {
        let coefficient_a = coefficient_a % &prime;
        let coefficient_b = coefficient_b % &prime;
        Self {
            prime,
            coefficient_a,
            coefficient_b,
        }
    }

    /// The prime modulus
    pub const fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Coefficient `a`
    pub const fn coefficient_a(&self) -> &BigUint {
        &self.coefficient_a
    }

    /// Coefficient `b`
    pub const fn coefficient_b(&self) -> &BigUint {
        &self.coefficient_b
    }

    /// The byte width of one field element
    pub fn coordinate_len(&self) -> usize {
        ((self.prime.bits() as usize) + 7) / 8
    }

    /// The right-hand side `x³ + ax + b`
    fn equation_rhs(&self, x: &BigUint) -> BigUint {
        let p = &self.prime;
        let x_cubed = mul_mod(&mul_mod(x, x, p), x, p);
        let ax = mul_mod(&self.coefficient_a, x, p);
        add_mod(&add_mod(&x_cubed, &ax, p), &self.coefficient_b, p)
    }

    /// Whether the point satisfies the curve equation
    pub fn contains(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                mul_mod(y, y, &self.prime) == self.equation_rhs(x)
            }
        }
    }

    /// Negate a point
    pub fn negate(&self, point: &CurvePoint) -> CurvePoint {
        match point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine {
                x: x.clone(),
                y: neg_mod(y, &self.prime),
            },
        }
    }

    /// Add two points
    pub fn add(&self, lhs: &CurvePoint, rhs: &CurvePoint) -> CurvePoint {
        let p = &self.prime;
        let (x1, y1) = match lhs {
            CurvePoint::Infinity => return rhs.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match rhs {
            CurvePoint::Infinity => return lhs.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };

        let lambda = if x1 == x2 {
            if add_mod(y1, y2, p).is_zero() {
                return CurvePoint::Infinity;
            }
            // Tangent slope (3x² + a) / 2y
            let numerator = add_mod(
                &mul_mod(&BigUint::from(3u32), &mul_mod(x1, x1, p), p),
                &self.coefficient_a,
                p,
            );
            mul_mod(&numerator, &inv_mod(&add_mod(y1, y1, p), p), p)
        } else {
            // Chord slope (y2 - y1) / (x2 - x1)
            mul_mod(
                &sub_mod(y2, y1, p),
                &inv_mod(&sub_mod(x2, x1, p), p),
                p,
            )
        };

        let x3 = sub_mod(&sub_mod(&mul_mod(&lambda, &lambda, p), x1, p), x2, p);
        let y3 = sub_mod(&mul_mod(&lambda, &sub_mod(x1, &x3, p), p), y1, p);
        CurvePoint::Affine { x: x3, y: y3 }
    }

    /// Scalar multiplication by double-and-add
    pub fn mul(&self, scalar: &BigUint, point: &CurvePoint) -> CurvePoint {
        let mut result = CurvePoint::Infinity;
        let mut addend = point.clone();

        for i in 0..scalar.bits() {
            if scalar.bit(i) {
                result = self.add(&result, &addend);
            }
            addend = self.add(&addend, &addend);
        }

        result
    }

    /// Reconstruct the candidate points with the given x-coordinate
    ///
    /// The wire carries bare x-coordinates for the proof values, so the
    /// verifier has to consider both solutions of `y² = x³ + ax + b`.
    /// Returns `None` when the right-hand side is a non-residue (no point
    /// with this x-coordinate exists). Requires `p ≡ 3 (mod 4)`.
    pub fn lift_x(&self, x: &BigUint) -> Option<[CurvePoint; 2]> {
        let x = x % &self.prime;
        let y = sqrt_mod(&self.equation_rhs(&x), &self.prime)?;
        let neg_y = neg_mod(&y, &self.prime);
        Some([
            CurvePoint::Affine { x: x.clone(), y },
            CurvePoint::Affine { x, y: neg_y },
        ])
    }

    /// Encode a point as `04 ‖ X ‖ Y` with fixed-width coordinates
    ///
    /// The point at infinity encodes as a single zero byte.
    pub fn encode_point(&self, point: &CurvePoint) -> Vec<u8> {
        match point {
            CurvePoint::Infinity => vec![0x00],
            CurvePoint::Affine { x, y } => {
                let width = self.coordinate_len();
                let mut out = Vec::with_capacity(1 + 2 * width);
                out.push(0x04);
                push_padded(&mut out, x, width);
                push_padded(&mut out, y, width);
                out
            }
        }
    }

    /// Decode a point produced by [`Self::encode_point`]
    ///
    /// The decoded point must satisfy the curve equation.
    pub fn decode_point(&self, bytes: &[u8]) -> Result<CurvePoint, CurveError> {
        match bytes {
            [0x00] => Ok(CurvePoint::Infinity),
            [0x04, coordinates @ ..] if !coordinates.is_empty() && coordinates.len() % 2 == 0 => {
                let (x_bytes, y_bytes) = coordinates.split_at(coordinates.len() / 2);
                let x = BigUint::from_bytes_be(x_bytes);
                let y = BigUint::from_bytes_be(y_bytes);
                if x >= self.prime || y >= self.prime {
                    return Err(CurveError::InvalidEncoding);
                }
                let point = CurvePoint::Affine { x, y };
                if self.contains(&point) {
                    Ok(point)
                } else {
                    Err(CurveError::NotOnCurve)
                }
            }
            _ => Err(CurveError::InvalidEncoding),
        }
    }
}

fn push_padded(out: &mut Vec<u8>, value: &BigUint, width: usize) {
    let bytes = value.to_bytes_be();
    debug_assert!(bytes.len() <= width);
    out.resize(out.len() + width.saturating_sub(bytes.len()), 0x00);
    out.extend_from_slice(&bytes);
}

/// The curve domain parameters a terminal installs on a card
///
/// Immutable once adopted by a card; a later `initialise` replaces the
/// whole domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveDomain {
    /// The underlying curve
    pub curve: WeierstrassCurve,
    /// The base point generating the order-`r` group
    pub generator: CurvePoint,
    /// The group order `r`
    pub order: BigUint,
}

impl CurveDomain {
    /// Validate that the generator lies on the curve
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.generator.is_infinity() || !self.curve.contains(&self.generator) {
            return Err(CurveError::InvalidDomain);
        }
        Ok(())
    }
}
