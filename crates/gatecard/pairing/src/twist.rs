//! Points on the sextic twist `y² = x³ + 3ξ` over `F_{p²}`
//!
//! Twist arithmetic lives on [`crate::BnCurve`], which owns the field
//! modulus and the twist coefficient.

use crate::fp2::Fp2;

/// A point on the twisted curve, in affine coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwistPoint {
    /// The point at infinity
    Infinity,
    /// An affine point
    Affine {
        /// x-coordinate
        x: Fp2,
        /// y-coordinate
        y: Fp2,
    },
}

impl TwistPoint {
    /// Construct an affine twist point
    pub const fn new(x: Fp2, y: Fp2) -> Self {
        Self::Affine { x, y }
    }

    /// Whether this is the point at infinity
    pub const fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// The x-coordinate, if the point is affine
    pub const fn x(&self) -> Option<&Fp2> {
        match self {
            Self::Infinity => None,
            Self::Affine { x, .. } => Some(x),
        }
    }

    /// The y-coordinate, if the point is affine
    pub const fn y(&self) -> Option<&Fp2> {
        match self {
            Self::Infinity => None,
            Self::Affine { y, .. } => Some(y),
        }
    }
}
