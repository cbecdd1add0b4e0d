//! The quadratic extension `F_{p²} = F_p[i]/(i² + 1)`
//!
//! Valid because `p ≡ 3 (mod 4)` for every supported curve, so `-1` is a
//! non-residue. Elements are `c0 + c1·i` with reduced coefficients.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::fp::{add_mod, inv_mod, mul_mod, neg_mod, sqrt_mod, sub_mod};

/// An element of `F_{p²}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fp2 {
    /// Constant coefficient
    pub c0: BigUint,
    /// Coefficient of `i`
    pub c1: BigUint,
}

impl Fp2 {
    /// Construct an element from its coefficients
    pub const fn new(c0: BigUint, c1: BigUint) -> Self {
        Self { c0, c1 }
    }

    /// The additive identity
    pub fn zero() -> Self {
        Self::new(BigUint::zero(), BigUint::zero())
    }

    /// The multiplicative identity
    pub fn one() -> Self {
        Self::new(BigUint::from(1u32), BigUint::zero())
    }

    /// Lift a base-field element
    pub fn from_base(c0: BigUint) -> Self {
        Self::new(c0, BigUint::zero())
    }

    /// Whether this is the additive identity
    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    pub(crate) fn add(&self, rhs: &Self, p: &BigUint) -> Self {
        Self::new(add_mod(&self.c0, &rhs.c0, p), add_mod(&self.c1, &rhs.c1, p))
    }

    pub(crate) fn sub(&self, rhs: &Self, p: &BigUint) -> Self {
        Self::new(sub_mod(&self.c0, &rhs.c0, p), sub_mod(&self.c1, &rhs.c1, p))
    }

    pub(crate) fn neg(&self, p: &BigUint) -> Self {
        Self::new(neg_mod(&self.c0, p), neg_mod(&self.c1, p))
    }

    pub(crate) fn mul(&self, rhs: &Self, p: &BigUint) -> Self {
        // (a0 + a1 i)(b0 + b1 i) = a0 b0 - a1 b1 + (a0 b1 + a1 b0) i
        let t0 = mul_mod(&self.c0, &rhs.c0, p);
        let t1 = mul_mod(&self.c1, &rhs.c1, p);
        let cross0 = mul_mod(&self.c0, &rhs.c1, p);
        let cross1 = mul_mod(&self.c1, &rhs.c0, p);
        Self::new(sub_mod(&t0, &t1, p), add_mod(&cross0, &cross1, p))
    }

    pub(crate) fn square(&self, p: &BigUint) -> Self {
        self.mul(self, p)
    }

    pub(crate) fn mul_base(&self, k: &BigUint, p: &BigUint) -> Self {
        Self::new(mul_mod(&self.c0, k, p), mul_mod(&self.c1, k, p))
    }

    /// Multiplicative inverse via the norm map
    pub(crate) fn invert(&self, p: &BigUint) -> Self {
        // (a + bi)^-1 = (a - bi) / (a² + b²)
        let norm = add_mod(
            &mul_mod(&self.c0, &self.c0, p),
            &mul_mod(&self.c1, &self.c1, p),
            p,
        );
        let norm_inv = inv_mod(&norm, p);
        Self::new(
            mul_mod(&self.c0, &norm_inv, p),
            mul_mod(&neg_mod(&self.c1, p), &norm_inv, p),
        )
    }

    /// Square root in `F_{p²}`, if one exists
    ///
    /// Uses the norm decomposition: for `z = c0 + c1·i` with `z² = a`,
    /// `c0² + c1²` must equal a base-field root of the norm of `a`, from
    /// which both coefficients follow. Requires `p ≡ 3 (mod 4)`.
    pub(crate) fn sqrt(&self, p: &BigUint) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        if self.c1.is_zero() {
            // Either c0 is a square in F_p, or -c0 is and the root is purely
            // imaginary: (bi)² = -b².
            if let Some(root) = sqrt_mod(&self.c0, p) {
                return Some(Self::new(root, BigUint::zero()));
            }
            let root = sqrt_mod(&neg_mod(&self.c0, p), p)?;
            return Some(Self::new(BigUint::zero(), root));
        }

        let norm = add_mod(
            &mul_mod(&self.c0, &self.c0, p),
            &mul_mod(&self.c1, &self.c1, p),
            p,
        );
        let mut norm_root = sqrt_mod(&norm, p)?;
        let half = inv_mod(&BigUint::from(2u32), p);

        // c0² = (a0 + n)/2 for one of the two base-field roots n
        let mut c0_sq = mul_mod(&add_mod(&self.c0, &norm_root, p), &half, p);
        let c0 = match sqrt_mod(&c0_sq, p) {
            Some(root) => root,
            None => {
                norm_root = neg_mod(&norm_root, p);
                c0_sq = mul_mod(&add_mod(&self.c0, &norm_root, p), &half, p);
                sqrt_mod(&c0_sq, p)?
            }
        };

        // c1 = a1 / (2 c0)
        let double_c0 = add_mod(&c0, &c0, p);
        if double_c0.is_zero() {
            return None;
        }
        let c1 = mul_mod(&self.c1, &inv_mod(&double_c0, p), p);

        let candidate = Self::new(c0, c1);
        if candidate.square(p) == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> BigUint {
        BigUint::parse_bytes(b"285935155822567759380819473491615908643", 10).unwrap()
    }

    fn xi() -> Fp2 {
        Fp2::new(BigUint::from(1u32), BigUint::from(1u32))
    }

    #[test]
    fn test_i_squared_is_minus_one() {
        let p = p();
        let i = Fp2::new(BigUint::zero(), BigUint::from(1u32));
        let minus_one = Fp2::new(&p - 1u32, BigUint::zero());
        assert_eq!(i.square(&p), minus_one);
    }

    #[test]
    fn test_inverse() {
        let p = p();
        let a = Fp2::new(BigUint::from(1234u32), BigUint::from(5678u32));
        assert_eq!(a.mul(&a.invert(&p), &p), Fp2::one());
    }

    #[test]
    fn test_sqrt_of_square() {
        let p = p();
        let a = Fp2::new(BigUint::from(31415u32), BigUint::from(92653u32));
        let square = a.square(&p);
        let root = a.square(&p).sqrt(&p).unwrap();
        assert_eq!(root.square(&p), square);
    }

    #[test]
    fn test_sqrt_of_base_field_square() {
        let p = p();
        let a = Fp2::from_base(BigUint::from(49u32));
        let root = a.sqrt(&p).unwrap();
        assert_eq!(root.square(&p), a);
    }

    #[test]
    fn test_xi_arithmetic() {
        // (1+i)(1-i) = 2
        let p = p();
        let conj = Fp2::new(BigUint::from(1u32), &p - 1u32);
        assert_eq!(xi().mul(&conj, &p), Fp2::from_base(BigUint::from(2u32)));
    }
}
