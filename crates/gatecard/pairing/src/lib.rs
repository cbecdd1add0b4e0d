//! Barreto-Naehrig pairing curve engine
//!
//! This crate provides exactly the curve operations the gatecard protocol
//! needs: short-Weierstrass arithmetic over a prime field, the twisted
//! curve over the quadratic extension, and a fixed bilinear pairing into
//! the degree-12 extension. It is not a general-purpose pairing library;
//! the curve family is fixed (BN curves selected by key length) and only
//! scalar multiplication, pairing evaluation and the field operations
//! backing them are exposed.
//!
//! The curve for key length `L` is derived from a fixed generator scalar
//! `u` as `p = 36u⁴+36u³+24u²+6u+1` and `r = 36u⁴+36u³+18u²+6u+1`, giving
//! `y² = x³ + 3` over `F_p` with generator `(1, 2)` of prime order `r`,
//! and the sextic twist `y² = x³ + 3ξ` over `F_{p²} = F_p[i]/(i²+1)` with
//! `ξ = 1 + i`. All supported key lengths yield `p ≡ 3 (mod 4)`, which the
//! square-root routines rely on.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod bn;
mod curve;
mod error;
mod fp;
mod fp2;
mod tower;
mod twist;

pub use bn::{BnCurve, KeyLength};
pub use curve::{CurveDomain, CurvePoint, WeierstrassCurve};
pub use error::CurveError;
pub use fp2::Fp2;
pub use tower::Fp12;
pub use twist::TwistPoint;

// Re-export the scalar type used throughout the public API.
pub use num_bigint::BigUint;
