//! Modular arithmetic helpers over `F_p`
//!
//! Operands are reduced representatives (`< p`); every helper returns a
//! reduced representative. Inversion uses Fermat's little theorem, which
//! is valid because every modulus in this crate is prime.

use num_bigint::BigUint;
use num_traits::Zero;

pub(crate) fn add_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    let mut sum = a + b;
    if sum >= *p {
        sum -= p;
    }
    sum
}

pub(crate) fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    if a >= b { a - b } else { p - b + a }
}

pub(crate) fn neg_mod(a: &BigUint, p: &BigUint) -> BigUint {
    if a.is_zero() { BigUint::zero() } else { p - a }
}

pub(crate) fn mul_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

pub(crate) fn inv_mod(a: &BigUint, p: &BigUint) -> BigUint {
    a.modpow(&(p - 2u32), p)
}

/// Square root modulo a prime `p ≡ 3 (mod 4)`, as `a^((p+1)/4)`
///
/// Returns `None` when `a` is a quadratic non-residue.
pub(crate) fn sqrt_mod(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    debug_assert_eq!((p % 4u32), BigUint::from(3u32));
    let candidate = a.modpow(&((p + 1u32) >> 2), p);
    if mul_mod(&candidate, &candidate, p) == *a {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn p() -> BigUint {
        // 128-bit BN prime for u = 1678770247
        BigUint::parse_bytes(b"285935155822567759380819473491615908643", 10).unwrap()
    }

    #[test]
    fn test_sub_wraps() {
        let p = p();
        let a = BigUint::from(5u32);
        let b = BigUint::from(9u32);
        assert_eq!(sub_mod(&a, &b, &p), &p - 4u32);
        assert_eq!(add_mod(&sub_mod(&a, &b, &p), &b, &p), a);
    }

    #[test]
    fn test_inverse() {
        let p = p();
        let a = BigUint::from(123456789u64);
        let inv = inv_mod(&a, &p);
        assert!(mul_mod(&a, &inv, &p).is_one());
    }

    #[test]
    fn test_sqrt_round_trip() {
        let p = p();
        let a = BigUint::from(98765432123456789u64) % &p;
        let square = mul_mod(&a, &a, &p);
        let root = sqrt_mod(&square, &p).unwrap();
        assert!(root == a || root == neg_mod(&a, &p));
    }

    #[test]
    fn test_sqrt_non_residue() {
        // p ≡ 3 (mod 4), so exactly one of {a, -a} has a root; a generator
        // of the curve equation rhs with no root must be rejected.
        let p = p();
        let a = BigUint::from(7u32);
        let square = mul_mod(&a, &a, &p);
        let non_residue = neg_mod(&square, &p);
        assert!(sqrt_mod(&non_residue, &p).is_none());
    }
}
