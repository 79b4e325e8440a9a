use super::error::TvmError;
use super::tvm::{PaymentTiming, future_value, payment_amount, present_value};
use super::types::{PlanInputs, PlanResult};

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn compute_plan(inputs: &PlanInputs) -> Result<PlanResult, TvmError> {
    let years_to_target = f64::from(inputs.years_to_target());
    let years_post_target = f64::from(inputs.years_post_target());
    let timing = PaymentTiming::Beginning;

    let net_real_post_target_return =
        real_return(inputs.post_target_return_rate, inputs.inflation_rate);

    let expense_at_target = finite(
        "expense_at_target",
        future_value(
            inputs.inflation_rate,
            years_to_target,
            0.0,
            -inputs.current_annual_expense,
            timing,
        ),
    )?;

    let base_required_corpus = finite(
        "base_required_corpus",
        present_value(
            net_real_post_target_return,
            years_post_target,
            -expense_at_target,
            0.0,
            timing,
        )?,
    )?;

    // Fixed terminal amount, so it is discounted at the nominal rate.
    let inheritance_corpus_component = if inputs.has_inheritance_goal() {
        finite(
            "inheritance_corpus_component",
            present_value(
                inputs.post_target_return_rate,
                years_post_target,
                0.0,
                -inputs.inheritance_goal,
                timing,
            )?,
        )?
    } else {
        0.0
    };

    let displayed_required_corpus = finite(
        "displayed_required_corpus",
        base_required_corpus + inheritance_corpus_component,
    )?;

    let future_value_of_existing_assets = finite(
        "future_value_of_existing_assets",
        future_value(
            inputs.existing_asset_return_rate,
            years_to_target,
            0.0,
            -inputs.current_investments,
            timing,
        ),
    )?;

    // Existing assets offset the base need only; the inheritance is funded separately.
    let base_gap = finite(
        "base_gap",
        base_required_corpus - future_value_of_existing_assets,
    )?;

    // Checked before flooring, since NaN.max(0.0) is 0.0.
    let required_monthly_contribution = finite(
        "required_monthly_contribution",
        monthly_contribution_for(inputs, base_gap)?,
    )?
    .max(0.0);
    let required_lumpsum = finite(
        "required_lumpsum",
        present_value(
            inputs.pre_target_return_rate,
            years_to_target,
            0.0,
            -base_gap,
            timing,
        )?,
    )?
    .max(0.0);

    let (additional_monthly_contribution, additional_lumpsum) = if inputs.has_inheritance_goal() {
        let monthly = monthly_contribution_for(inputs, inheritance_corpus_component)?;
        // Annual level payment, not a present value; kept for parity with the
        // reference workbook.
        let lumpsum = payment_amount(
            inputs.pre_target_return_rate,
            years_to_target,
            0.0,
            -inheritance_corpus_component,
            timing,
        )?;
        (
            finite("additional_monthly_contribution", monthly)?.max(0.0),
            finite("additional_lumpsum", lumpsum)?.max(0.0),
        )
    } else {
        (0.0, 0.0)
    };

    let coverage_ratio = coverage(future_value_of_existing_assets, displayed_required_corpus);

    Ok(PlanResult {
        net_real_post_target_return,
        expense_at_target,
        base_required_corpus,
        inheritance_corpus_component,
        displayed_required_corpus,
        future_value_of_existing_assets,
        base_gap,
        required_monthly_contribution,
        required_lumpsum,
        additional_monthly_contribution,
        additional_lumpsum,
        coverage_ratio,
    })
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, TvmError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TvmError::NonFinite { quantity })
    }
}

fn real_return(nominal: f64, inflation: f64) -> f64 {
    (nominal - inflation) / (1.0 + inflation)
}

fn monthly_contribution_for(inputs: &PlanInputs, target: f64) -> Result<f64, TvmError> {
    payment_amount(
        inputs.pre_target_return_rate / MONTHS_PER_YEAR,
        f64::from(inputs.years_to_target()) * MONTHS_PER_YEAR,
        0.0,
        -target,
        PaymentTiming::Beginning,
    )
}

fn coverage(existing_at_target: f64, required_corpus: f64) -> f64 {
    if required_corpus == 0.0 {
        return 0.0;
    }
    (existing_at_target / required_corpus).clamp(0.0, 1.0)
}
