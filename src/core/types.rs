use serde::Serialize;

/// Plan assumptions with rates as fractions (0.05 = 5%).
///
/// The engine trusts these values; ordering and sign checks belong to the caller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlanInputs {
    pub current_age: u32,
    pub target_age: u32,
    pub life_expectancy_age: u32,
    pub inflation_rate: f64,
    pub pre_target_return_rate: f64,
    pub post_target_return_rate: f64,
    pub existing_asset_return_rate: f64,
    pub current_monthly_expense: f64,
    pub current_annual_expense: f64,
    pub current_investments: f64,
    pub inheritance_goal: f64,
}

impl PlanInputs {
    pub fn years_to_target(&self) -> u32 {
        self.target_age.saturating_sub(self.current_age)
    }

    pub fn years_post_target(&self) -> u32 {
        self.life_expectancy_age.saturating_sub(self.target_age)
    }

    pub fn has_inheritance_goal(&self) -> bool {
        self.inheritance_goal > 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub net_real_post_target_return: f64,
    /// Inflated annual expense in the year the target age is reached.
    pub expense_at_target: f64,
    pub base_required_corpus: f64,
    pub inheritance_corpus_component: f64,
    pub displayed_required_corpus: f64,
    pub future_value_of_existing_assets: f64,
    /// Negative when existing assets already exceed the base corpus.
    pub base_gap: f64,
    pub required_monthly_contribution: f64,
    pub required_lumpsum: f64,
    pub additional_monthly_contribution: f64,
    pub additional_lumpsum: f64,
    pub coverage_ratio: f64,
}

impl PlanResult {
    pub fn has_surplus(&self) -> bool {
        self.base_gap < 0.0
    }

    pub fn gap_to_fund(&self) -> f64 {
        self.base_gap.max(0.0)
    }

    pub fn readiness(&self) -> Readiness {
        Readiness::from_coverage(self.coverage_ratio)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Low,
    Moderate,
    Strong,
}

impl Readiness {
    pub fn from_coverage(coverage_ratio: f64) -> Self {
        if coverage_ratio >= 0.85 {
            Readiness::Strong
        } else if coverage_ratio >= 0.5 {
            Readiness::Moderate
        } else {
            Readiness::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Readiness::Low => "Low",
            Readiness::Moderate => "Moderate",
            Readiness::Strong => "Strong",
        }
    }
}
