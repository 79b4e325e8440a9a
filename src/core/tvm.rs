//! Spreadsheet-parity annuity formulas.
//!
//! Signs follow the cash-flow convention of the common spreadsheet FV/PV/PMT
//! functions: money paid out is negative, money received is positive. Nothing
//! here clamps or rounds.

use super::error::TvmError;

/// Rates with a smaller magnitude take the zero-rate branch.
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// When each periodic payment falls inside its period.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PaymentTiming {
    /// Spreadsheet `type = 0`.
    End,
    /// Spreadsheet `type = 1`.
    Beginning,
}

impl PaymentTiming {
    fn factor(self) -> f64 {
        match self {
            PaymentTiming::End => 0.0,
            PaymentTiming::Beginning => 1.0,
        }
    }
}

fn growth(rate: f64, periods: f64) -> f64 {
    (1.0 + rate).powf(periods)
}

fn is_zero_rate(rate: f64) -> bool {
    rate.abs() < ZERO_RATE_EPSILON
}

pub fn future_value(
    rate: f64,
    periods: f64,
    payment: f64,
    present_value: f64,
    timing: PaymentTiming,
) -> f64 {
    if is_zero_rate(rate) {
        return -(present_value + payment * periods);
    }
    let g = growth(rate, periods);
    -(present_value * g + payment * (1.0 + rate * timing.factor()) * (g - 1.0) / rate)
}

pub fn present_value(
    rate: f64,
    periods: f64,
    payment: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> Result<f64, TvmError> {
    if is_zero_rate(rate) {
        return Ok(-(future_value + payment * periods));
    }
    let g = growth(rate, periods);
    if g == 0.0 {
        return Err(TvmError::ZeroGrowth { rate, periods });
    }
    Ok(-(future_value + payment * (1.0 + rate * timing.factor()) * (g - 1.0) / rate) / g)
}

/// Level payment per period that moves `present_value` to `future_value`.
///
/// Zero or negative `periods` yields `0.0`: there is nothing to amortize over.
pub fn payment_amount(
    rate: f64,
    periods: f64,
    present_value: f64,
    future_value: f64,
    timing: PaymentTiming,
) -> Result<f64, TvmError> {
    if periods <= 0.0 {
        return Ok(0.0);
    }
    if is_zero_rate(rate) {
        return Ok(-(future_value + present_value) / periods);
    }
    let g = growth(rate, periods);
    let denominator = (1.0 + rate * timing.factor()) * (g - 1.0);
    if denominator == 0.0 {
        return Err(TvmError::DegenerateAnnuity { rate, periods });
    }
    Ok(-(rate * (present_value * g + future_value)) / denominator)
}
