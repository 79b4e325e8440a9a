use thiserror::Error;

/// Numeric-domain failures raised instead of returning NaN or infinity.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TvmError {
    #[error("growth factor is zero for rate {rate} over {periods} periods")]
    ZeroGrowth { rate: f64, periods: f64 },

    #[error("annuity denominator is zero for rate {rate} over {periods} periods")]
    DegenerateAnnuity { rate: f64, periods: f64 },

    #[error("{quantity} is not a finite number")]
    NonFinite { quantity: &'static str },
}
