//! The Barreto-Naehrig curve family and its pairing
//!
//! A curve instance is selected by key length; each key length maps to a
//! fixed generator scalar `u` from which the modulus, the group order and
//! the trace are derived. The pairing is the optimal-ate variant: a
//! Miller loop of length `6u + 2` over the twist image in `F_{p¹²}`,
//! two Frobenius adjustment lines, and the final exponentiation.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use crate::curve::{CurveDomain, CurvePoint, WeierstrassCurve};
use crate::error::CurveError;
use crate::fp2::Fp2;
use crate::tower::{Fp6, Fp12};
use crate::twist::TwistPoint;

/// Supported key lengths, each tied to a fixed BN generator scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLength {
    /// 128-bit field
    Bits128,
    /// 160-bit field
    Bits160,
    /// 192-bit field
    Bits192,
    /// 224-bit field
    Bits224,
}

impl KeyLength {
    /// All supported key lengths
    pub const ALL: [Self; 4] = [Self::Bits128, Self::Bits160, Self::Bits192, Self::Bits224];

    /// The field size in bits
    pub const fn bits(self) -> u16 {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
        }
    }

    /// Look up a key length by its bit size
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            128 => Some(Self::Bits128),
            160 => Some(Self::Bits160),
            192 => Some(Self::Bits192),
            224 => Some(Self::Bits224),
            _ => None,
        }
    }

    /// The BN generator scalar `u` for this key length
    pub const fn generator_scalar(self) -> u64 {
        match self {
            Self::Bits128 => 1_678_770_247,
            Self::Bits160 => 448_873_116_367,
            Self::Bits192 => 105_553_250_485_267,
            Self::Bits224 => 29_417_389_579_040_251,
        }
    }
}

/// Fixed twist points for the deterministic setup, as decimal coordinate
/// strings `(x.c0, x.c1, y.c0, y.c1)`. The 224-bit instance has no
/// published point; randomised setup covers it.
const fn fixed_twist_point_vectors(length: KeyLength) -> Option<[&'static str; 4]> {
    match length {
        KeyLength::Bits128 => Some([
            "110386064370833072982563086539924190163",
            "6608942705488818925026082852251483154",
            "269217395288346913820929092968881851980",
            "233835185036331024500142662901760278727",
        ]),
        KeyLength::Bits160 => Some([
            "643284081012003100145372605441605069929358220305",
            "1368080763551537842864000867494632960265168873699",
            "320378783996916664601716070577207726212948757265",
            "1429829949789822849115078061391392735933877185539",
        ]),
        KeyLength::Bits192 => Some([
            "2903704171802298378325242062709100903880592437723006672773",
            "1034344551609471602370610719988082697293410563719698469006",
            "3154781622325109970942793240041155216575064371213525353572",
            "1613585477473619097296000057982415887715414154353961900643",
        ]),
        KeyLength::Bits224 => None,
    }
}

/// A pairing-friendly BN curve instance
///
/// Holds the base curve `y² = x³ + 3` over `F_p` with generator `(1, 2)`
/// of order `r`, and the twisted curve `y² = x³ + 3ξ` over `F_{p²}`.
/// Construction happens once per terminal session; the instance is
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct BnCurve {
    key_length: KeyLength,
    u: BigUint,
    order: BigUint,
    base: WeierstrassCurve,
    generator: CurvePoint,
    twist_b: Fp2,
}

impl BnCurve {
    /// Construct the curve for the given key length
    pub fn new(key_length: KeyLength) -> Self {
        let u = BigUint::from(key_length.generator_scalar());
        let u2 = &u * &u;
        let u3 = &u2 * &u;
        let u4 = &u2 * &u2;

        // p = 36u^4 + 36u^3 + 24u^2 + 6u + 1
        let p = &u4 * 36u32 + &u3 * 36u32 + &u2 * 24u32 + &u * 6u32 + 1u32;
        // r = 36u^4 + 36u^3 + 18u^2 + 6u + 1
        let order = &u4 * 36u32 + &u3 * 36u32 + &u2 * 18u32 + &u * 6u32 + 1u32;

        let base = WeierstrassCurve::new(p, BigUint::zero(), BigUint::from(3u32));
        let generator = CurvePoint::new(BigUint::one(), BigUint::from(2u32));
        // b' = 3 * xi = 3 + 3i
        let twist_b = Fp2::new(BigUint::from(3u32), BigUint::from(3u32));

        Self {
            key_length,
            u,
            order,
            base,
            generator,
            twist_b,
        }
    }

    /// The key length this curve was built for
    pub const fn key_length(&self) -> KeyLength {
        self.key_length
    }

    /// The base curve over `F_p`
    pub const fn base(&self) -> &WeierstrassCurve {
        &self.base
    }

    /// The base-curve generator `(1, 2)`
    pub const fn generator(&self) -> &CurvePoint {
        &self.generator
    }

    /// The group order `r`
    pub const fn order(&self) -> &BigUint {
        &self.order
    }

    /// The prime modulus `p`
    pub const fn modulus(&self) -> &BigUint {
        self.base.prime()
    }

    /// The domain parameters a card is initialised with
    pub fn domain(&self) -> CurveDomain {
        CurveDomain {
            curve: self.base.clone(),
            generator: self.generator.clone(),
            order: self.order.clone(),
        }
    }

    /// The deterministic fixed point on the twisted curve
    pub fn fixed_twist_point(&self) -> Result<TwistPoint, CurveError> {
        let [x0, x1, y0, y1] = fixed_twist_point_vectors(self.key_length)
            .ok_or(CurveError::NoFixedPoint(self.key_length.bits()))?;
        let parse = |s: &str| BigUint::parse_bytes(s.as_bytes(), 10).unwrap_or_default();
        Ok(TwistPoint::new(
            Fp2::new(parse(x0), parse(x1)),
            Fp2::new(parse(y0), parse(y1)),
        ))
    }

    /// Sample a random point of order `r` on the twisted curve
    ///
    /// Rejection-samples an x-coordinate until the curve equation has a
    /// root, then clears the twist cofactor `2p − r`.
    pub fn random_twist_point<R: Rng + ?Sized>(&self, rng: &mut R) -> TwistPoint {
        let p = self.modulus();
        // #E'(F_{p²}) = r(2p − r)
        let cofactor = (p << 1) - &self.order;

        loop {
            let x = Fp2::new(rng.gen_biguint_below(p), rng.gen_biguint_below(p));
            let rhs = self.twist_equation_rhs(&x);
            let Some(y) = rhs.sqrt(p) else {
                continue;
            };
            let point = self.twist_mul(&cofactor, &TwistPoint::new(x, y));
            if !point.is_infinity() {
                return point;
            }
        }
    }

    fn twist_equation_rhs(&self, x: &Fp2) -> Fp2 {
        let p = self.modulus();
        x.square(p).mul(x, p).add(&self.twist_b, p)
    }

    /// Whether the point satisfies the twist equation
    pub fn twist_contains(&self, point: &TwistPoint) -> bool {
        match point {
            TwistPoint::Infinity => true,
            TwistPoint::Affine { x, y } => {
                y.square(self.modulus()) == self.twist_equation_rhs(x)
            }
        }
    }

    /// Add two points on the twisted curve
    pub fn twist_add(&self, lhs: &TwistPoint, rhs: &TwistPoint) -> TwistPoint {
        let p = self.modulus();
        let (x1, y1) = match lhs {
            TwistPoint::Infinity => return rhs.clone(),
            TwistPoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match rhs {
            TwistPoint::Infinity => return lhs.clone(),
            TwistPoint::Affine { x, y } => (x, y),
        };

        let lambda = if x1 == x2 {
            if y1.add(y2, p).is_zero() {
                return TwistPoint::Infinity;
            }
            // 3x² / 2y (the twist has no linear term)
            x1.square(p)
                .mul_base(&BigUint::from(3u32), p)
                .mul(&y1.add(y1, p).invert(p), p)
        } else {
            y2.sub(y1, p).mul(&x2.sub(x1, p).invert(p), p)
        };

        let x3 = lambda.square(p).sub(x1, p).sub(x2, p);
        let y3 = lambda.mul(&x1.sub(&x3, p), p).sub(y1, p);
        TwistPoint::new(x3, y3)
    }

    /// Scalar multiplication on the twisted curve
    pub fn twist_mul(&self, scalar: &BigUint, point: &TwistPoint) -> TwistPoint {
        let mut result = TwistPoint::Infinity;
        let mut addend = point.clone();

        for i in 0..scalar.bits() {
            if scalar.bit(i) {
                result = self.twist_add(&result, &addend);
            }
            addend = self.twist_add(&addend, &addend);
        }

        result
    }

    /// Evaluate the pairing `e(P, Q)`
    ///
    /// Bilinear in both arguments for `P` in the order-`r` base-curve
    /// group and `Q` in the order-`r` twist subgroup. By convention the
    /// result for an infinity argument is the identity.
    pub fn pairing(&self, point: &CurvePoint, twist_point: &TwistPoint) -> Fp12 {
        let p = self.modulus();

        let (px, py) = match point {
            CurvePoint::Infinity => return Fp12::one(),
            CurvePoint::Affine { x, y } => (fp12_from_base(x.clone()), fp12_from_base(y.clone())),
        };
        let Some(q) = self.untwist(twist_point) else {
            return Fp12::one();
        };

        // Miller loop over s = 6u + 2
        let s = &self.u * 6u32 + 2u32;
        let mut f = Fp12::one();
        let mut t = q.clone();

        for i in (0..s.bits() - 1).rev() {
            f = f.mul(&f, p).mul(&self.line(&t, &t, &px, &py), p);
            t = self.ext_add(&t, &t);
            if s.bit(i) {
                f = f.mul(&self.line(&t, &q, &px, &py), p);
                t = self.ext_add(&t, &q);
            }
        }

        // Frobenius adjustment lines
        let q1 = self.frobenius_point(&q);
        let q2 = self.ext_negate(&self.frobenius_point(&q1));

        f = f.mul(&self.line(&t, &q1, &px, &py), p);
        t = self.ext_add(&t, &q1);
        f = f.mul(&self.line(&t, &q2, &px, &py), p);

        self.final_exponentiation(f)
    }

    /// Map a twist point into `E(F_{p¹²})`
    ///
    /// `(x, y) ↦ (x·ξ⁻¹·w⁴, y·ξ⁻¹·w³)`, the inverse of the sextic twist.
    fn untwist(&self, point: &TwistPoint) -> Option<Ext12Point> {
        let p = self.modulus();
        let (x, y) = match point {
            TwistPoint::Infinity => return None,
            TwistPoint::Affine { x, y } => (x, y),
        };

        let xi_inv = Fp2::new(BigUint::one(), BigUint::one()).invert(p);

        // x·ξ⁻¹ sits on the w⁴ = v² slot, y·ξ⁻¹ on the w³ = v·w slot
        let ext_x = Fp12 {
            c0: Fp6 {
                c0: Fp2::zero(),
                c1: Fp2::zero(),
                c2: x.mul(&xi_inv, p),
            },
            c1: Fp6::zero(),
        };
        let ext_y = Fp12 {
            c0: Fp6::zero(),
            c1: Fp6 {
                c0: Fp2::zero(),
                c1: y.mul(&xi_inv, p),
                c2: Fp2::zero(),
            },
        };

        Some(Ext12Point::Affine { x: ext_x, y: ext_y })
    }

    /// Affine addition in `E(F_{p¹²})`
    fn ext_add(&self, lhs: &Ext12Point, rhs: &Ext12Point) -> Ext12Point {
        let p = self.modulus();
        let (x1, y1) = match lhs {
            Ext12Point::Infinity => return rhs.clone(),
            Ext12Point::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match rhs {
            Ext12Point::Infinity => return lhs.clone(),
            Ext12Point::Affine { x, y } => (x, y),
        };

        let lambda = if x1 == x2 {
            if *y1 != *y2 {
                return Ext12Point::Infinity;
            }
            fp12_from_base(BigUint::from(3u32))
                .mul(&x1.mul(x1, p), p)
                .mul(&y1.add(y1, p).invert(p), p)
        } else {
            y2.sub(y1, p).mul(&x2.sub(x1, p).invert(p), p)
        };

        let x3 = lambda.mul(&lambda, p).sub(x1, p).sub(x2, p);
        let y3 = lambda.mul(&x1.sub(&x3, p), p).sub(y1, p);
        Ext12Point::Affine { x: x3, y: y3 }
    }

    /// The Miller line through `t` and `q`, evaluated at `(px, py)`
    fn line(&self, t: &Ext12Point, q: &Ext12Point, px: &Fp12, py: &Fp12) -> Fp12 {
        let p = self.modulus();
        let (x1, y1) = match t {
            Ext12Point::Infinity => {
                return match q {
                    Ext12Point::Infinity => Fp12::one(),
                    Ext12Point::Affine { x, .. } => px.sub(x, p),
                };
            }
            Ext12Point::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match q {
            Ext12Point::Infinity => return px.sub(x1, p),
            Ext12Point::Affine { x, y } => (x, y),
        };

        let lambda = if x1 == x2 && y1 == y2 {
            fp12_from_base(BigUint::from(3u32))
                .mul(&x1.mul(x1, p), p)
                .mul(&y1.add(y1, p).invert(p), p)
        } else if x1 == x2 {
            // Vertical line
            return px.sub(x1, p);
        } else {
            y2.sub(y1, p).mul(&x2.sub(x1, p).invert(p), p)
        };

        // l = λ(px − x1) − (py − y1)
        lambda
            .mul(&px.sub(x1, p), p)
            .sub(&py.sub(y1, p), p)
    }

    /// The p-power Frobenius endomorphism on `E(F_{p¹²})`
    fn frobenius_point(&self, point: &Ext12Point) -> Ext12Point {
        let p = self.modulus();
        match point {
            Ext12Point::Infinity => Ext12Point::Infinity,
            Ext12Point::Affine { x, y } => Ext12Point::Affine {
                x: x.pow(p, p),
                y: y.pow(p, p),
            },
        }
    }

    fn ext_negate(&self, point: &Ext12Point) -> Ext12Point {
        match point {
            Ext12Point::Infinity => Ext12Point::Infinity,
            Ext12Point::Affine { x, y } => Ext12Point::Affine {
                x: x.clone(),
                y: y.neg(self.modulus()),
            },
        }
    }

    /// Raise the Miller value to `(p¹² − 1)/r`
    fn final_exponentiation(&self, f: Fp12) -> Fp12 {
        let p = self.modulus();

        // Easy part: f^(p⁶−1) then ^(p²+1)
        let f = f.conjugate(p).mul(&f.invert(p), p);
        let p_squared = p * p;
        let f = f.pow(&p_squared, p).mul(&f, p);

        // Hard part: (p⁴ − p² + 1)/r, exact by construction
        let p_fourth = &p_squared * &p_squared;
        let hard = (&p_fourth - &p_squared + 1u32) / &self.order;
        f.pow(&hard, p)
    }
}

/// A point on `E(F_{p¹²})`, used only inside the Miller loop
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ext12Point {
    Infinity,
    Affine { x: Fp12, y: Fp12 },
}

/// Embed a base-field element into `F_{p¹²}`
fn fp12_from_base(value: BigUint) -> Fp12 {
    Fp12 {
        c0: Fp6 {
            c0: Fp2::from_base(value),
            c1: Fp2::zero(),
            c2: Fp2::zero(),
        },
        c1: Fp6::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_curve_parameters_match_construction() {
        for length in KeyLength::ALL {
            let curve = BnCurve::new(length);
            assert_eq!(curve.modulus().bits(), u64::from(length.bits()));
            // p ≡ 3 (mod 4), required by the square-root routines
            assert_eq!(curve.modulus() % 4u32, BigUint::from(3u32));
            // p + 1 − r = t = 6u² + 1
            let t = &curve.u * &curve.u * 6u32 + 1u32;
            assert_eq!(curve.modulus() + 1u32 - curve.order(), t);
            assert!(curve.base().contains(curve.generator()));
        }
    }

    #[test]
    fn test_generator_order() {
        let curve = BnCurve::new(KeyLength::Bits128);
        assert!(
            curve
                .base()
                .mul(curve.order(), curve.generator())
                .is_infinity()
        );
    }

    #[test]
    fn test_fixed_twist_points_valid() {
        for length in [KeyLength::Bits128, KeyLength::Bits160, KeyLength::Bits192] {
            let curve = BnCurve::new(length);
            let q = curve.fixed_twist_point().unwrap();
            assert!(curve.twist_contains(&q));
            assert!(curve.twist_mul(curve.order(), &q).is_infinity());
        }
    }

    #[test]
    fn test_no_fixed_twist_point_for_224() {
        let curve = BnCurve::new(KeyLength::Bits224);
        assert_eq!(
            curve.fixed_twist_point(),
            Err(CurveError::NoFixedPoint(224))
        );
    }

    #[test]
    fn test_random_twist_point_has_group_order() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let mut rng = StdRng::seed_from_u64(7);
        let q = curve.random_twist_point(&mut rng);
        assert!(curve.twist_contains(&q));
        assert!(!q.is_infinity());
        assert!(curve.twist_mul(curve.order(), &q).is_infinity());
    }

    #[test]
    fn test_pairing_bilinearity() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let q = curve.fixed_twist_point().unwrap();
        let g = curve.generator();
        let p = curve.modulus();

        let a = BigUint::from(0x1234_5678_9abc_u64);
        let ag = curve.base().mul(&a, g);
        let aq = curve.twist_mul(&a, &q);

        let base = curve.pairing(g, &q);
        assert!(!base.is_one());

        let left = curve.pairing(&ag, &q);
        let middle = curve.pairing(g, &aq);
        let right = base.pow(&a, p);
        assert_eq!(left, middle);
        assert_eq!(left, right);
    }

    #[test]
    fn test_pairing_blinding_identity() {
        // e(b·Pc, sa·Q) == e(b·(sa·Pc), Q): the relation the credential
        // verification relies on
        let curve = BnCurve::new(KeyLength::Bits128);
        let q = curve.fixed_twist_point().unwrap();
        let g = curve.generator();

        let d_c = BigUint::from(0xdead_beef_u64);
        let sa = BigUint::from(0x0bad_cafe_u64);
        let blind = BigUint::from(0x1357_9bdf_u64);

        let card_key = curve.base().mul(&d_c, g);
        let cert = curve.base().mul(&sa, &card_key);
        let sa_q = curve.twist_mul(&sa, &q);

        let blinded_key = curve.base().mul(&blind, &card_key);
        let blinded_cert = curve.base().mul(&blind, &cert);

        assert_eq!(
            curve.pairing(&blinded_key, &sa_q),
            curve.pairing(&blinded_cert, &q)
        );
    }

    #[test]
    fn test_pairing_inverts_on_negation() {
        let curve = BnCurve::new(KeyLength::Bits128);
        let q = curve.fixed_twist_point().unwrap();
        let point = curve.base().mul(&BigUint::from(42u32), curve.generator());
        let negated = curve.base().negate(&point);

        let e1 = curve.pairing(&point, &q);
        let e2 = curve.pairing(&negated, &q);
        assert!(e1.mul(&e2, curve.modulus()).is_one());
    }
}
