//! The extension tower `F_{p⁶} = F_{p²}[v]/(v³ − ξ)` and
//! `F_{p¹²} = F_{p⁶}[w]/(w² − v)`, with `ξ = 1 + i`
//!
//! Only the operations the pairing needs are implemented: multiplication,
//! inversion, conjugation and exponentiation. Pairing values are compared
//! with plain equality.

use num_bigint::BigUint;

use crate::fp2::Fp2;

/// Multiply an `F_{p²}` element by the non-residue `ξ = 1 + i`
///
/// `(a0 + a1·i)(1 + i) = (a0 − a1) + (a0 + a1)·i`
fn mul_by_xi(a: &Fp2, p: &BigUint) -> Fp2 {
    use crate::fp::{add_mod, sub_mod};
    Fp2::new(sub_mod(&a.c0, &a.c1, p), add_mod(&a.c0, &a.c1, p))
}

/// An element of `F_{p⁶}`, `c0 + c1·v + c2·v²`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fp6 {
    pub(crate) c0: Fp2,
    pub(crate) c1: Fp2,
    pub(crate) c2: Fp2,
}

impl Fp6 {
    pub(crate) fn zero() -> Self {
        Self {
            c0: Fp2::zero(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    pub(crate) fn one() -> Self {
        Self {
            c0: Fp2::one(),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        }
    }

    pub(crate) fn add(&self, rhs: &Self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.add(&rhs.c0, p),
            c1: self.c1.add(&rhs.c1, p),
            c2: self.c2.add(&rhs.c2, p),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.sub(&rhs.c0, p),
            c1: self.c1.sub(&rhs.c1, p),
            c2: self.c2.sub(&rhs.c2, p),
        }
    }

    pub(crate) fn neg(&self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.neg(p),
            c1: self.c1.neg(p),
            c2: self.c2.neg(p),
        }
    }

    pub(crate) fn mul(&self, rhs: &Self, p: &BigUint) -> Self {
        // Toom-style multiplication with v³ = ξ reduction
        let t0 = self.c0.mul(&rhs.c0, p);
        let t1 = self.c1.mul(&rhs.c1, p);
        let t2 = self.c2.mul(&rhs.c2, p);

        let s12 = self
            .c1
            .add(&self.c2, p)
            .mul(&rhs.c1.add(&rhs.c2, p), p)
            .sub(&t1, p)
            .sub(&t2, p);
        let s01 = self
            .c0
            .add(&self.c1, p)
            .mul(&rhs.c0.add(&rhs.c1, p), p)
            .sub(&t0, p)
            .sub(&t1, p);
        let s02 = self
            .c0
            .add(&self.c2, p)
            .mul(&rhs.c0.add(&rhs.c2, p), p)
            .sub(&t0, p)
            .sub(&t2, p);

        Self {
            c0: t0.add(&mul_by_xi(&s12, p), p),
            c1: s01.add(&mul_by_xi(&t2, p), p),
            c2: s02.add(&t1, p),
        }
    }

    /// Multiply by `v`
    pub(crate) fn mul_by_v(&self, p: &BigUint) -> Self {
        Self {
            c0: mul_by_xi(&self.c2, p),
            c1: self.c0.clone(),
            c2: self.c1.clone(),
        }
    }

    pub(crate) fn invert(&self, p: &BigUint) -> Self {
        let a0 = self.c0.square(p).sub(&mul_by_xi(&self.c1.mul(&self.c2, p), p), p);
        let a1 = mul_by_xi(&self.c2.square(p), p).sub(&self.c0.mul(&self.c1, p), p);
        let a2 = self.c1.square(p).sub(&self.c0.mul(&self.c2, p), p);

        let norm = self.c0.mul(&a0, p).add(
            &mul_by_xi(
                &self.c2.mul(&a1, p).add(&self.c1.mul(&a2, p), p),
                p,
            ),
            p,
        );
        let norm_inv = norm.invert(p);

        Self {
            c0: a0.mul(&norm_inv, p),
            c1: a1.mul(&norm_inv, p),
            c2: a2.mul(&norm_inv, p),
        }
    }
}

/// An element of `F_{p¹²}`, `c0 + c1·w`
///
/// This is the target group of the pairing; verification only needs
/// multiplication, equality and the multiplicative identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fp12 {
    pub(crate) c0: Fp6,
    pub(crate) c1: Fp6,
}

impl Fp12 {
    /// The multiplicative identity
    pub fn one() -> Self {
        Self {
            c0: Fp6::one(),
            c1: Fp6::zero(),
        }
    }

    /// Whether this is the multiplicative identity
    pub fn is_one(&self) -> bool {
        *self == Self::one()
    }

    pub(crate) fn add(&self, rhs: &Self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.add(&rhs.c0, p),
            c1: self.c1.add(&rhs.c1, p),
        }
    }

    pub(crate) fn sub(&self, rhs: &Self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.sub(&rhs.c0, p),
            c1: self.c1.sub(&rhs.c1, p),
        }
    }

    pub(crate) fn neg(&self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.neg(p),
            c1: self.c1.neg(p),
        }
    }

    /// Multiply two elements
    pub fn mul(&self, rhs: &Self, p: &BigUint) -> Self {
        // Karatsuba over the quadratic extension with w² = v
        let ac = self.c0.mul(&rhs.c0, p);
        let bd = self.c1.mul(&rhs.c1, p);
        let cross = self
            .c0
            .add(&self.c1, p)
            .mul(&rhs.c0.add(&rhs.c1, p), p)
            .sub(&ac, p)
            .sub(&bd, p);

        Self {
            c0: ac.add(&bd.mul_by_v(p), p),
            c1: cross,
        }
    }

    pub(crate) fn square(&self, p: &BigUint) -> Self {
        self.mul(self, p)
    }

    /// Conjugation over `F_{p⁶}`, i.e. the `p⁶`-power Frobenius
    pub(crate) fn conjugate(&self, p: &BigUint) -> Self {
        Self {
            c0: self.c0.clone(),
            c1: self.c1.neg(p),
        }
    }

    /// Multiplicative inverse
    pub fn invert(&self, p: &BigUint) -> Self {
        // (a + bw)^-1 = (a - bw) / (a² - b²v)
        let norm = self
            .c0
            .mul(&self.c0, p)
            .sub(&self.c1.mul(&self.c1, p).mul_by_v(p), p);
        let norm_inv = norm.invert(p);

        Self {
            c0: self.c0.mul(&norm_inv, p),
            c1: self.c1.neg(p).mul(&norm_inv, p),
        }
    }

    /// Exponentiation by square-and-multiply
    pub fn pow(&self, exponent: &BigUint, p: &BigUint) -> Self {
        let mut result = Self::one();
        let bits = exponent.bits();
        for i in (0..bits).rev() {
            result = result.square(p);
            if exponent.bit(i) {
                result = result.mul(self, p);
            }
        }
        result
    }
}
