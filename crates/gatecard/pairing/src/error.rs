//! Error types for curve and pairing operations

/// Errors raised by curve construction and point decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// A point encoding could not be parsed
    #[error("malformed point encoding")]
    InvalidEncoding,

    /// A decoded or supplied point does not satisfy the curve equation
    #[error("point is not on the curve")]
    NotOnCurve,

    /// The supplied generator does not lie on the supplied curve
    #[error("domain generator is not on the curve")]
    InvalidDomain,

    /// No deterministic twist point is published for this key length
    #[error("no fixed twist point for {0}-bit keys")]
    NoFixedPoint(u16),
}
